//! Step status models

use crate::core::context::Context;
use crate::core::step::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a step within one workflow instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// Status has not been reported
    #[default]
    Unknown,
    /// Step is waiting to run
    Pending,
    /// Step is currently running
    Running,
    /// Step completed successfully
    Completed,
    /// Step failed
    Failed,
    /// Step was skipped (skip flag set, or its branch was not taken)
    Skipped,
}

impl StepStatus {
    /// Status a step starts with before an instance runs it
    pub fn initial(step: &Step) -> Self {
        if step.skip {
            StepStatus::Skipped
        } else {
            StepStatus::Pending
        }
    }

    /// Check if the status is final for this instance
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Unknown => "Unknown",
            StepStatus::Pending => "Pending",
            StepStatus::Running => "Running",
            StepStatus::Completed => "Completed",
            StepStatus::Failed => "Failed",
            StepStatus::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that a step changed status, carrying a snapshot of the context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepChangeEvent {
    /// Workflow instance the step belongs to
    pub instance_id: String,

    /// Step that changed
    pub step_id: String,

    /// New status
    pub status: StepStatus,

    /// Context at the time of the change
    pub data: Context,

    /// When the change was observed
    pub occurred_at: DateTime<Utc>,
}

impl StepChangeEvent {
    pub fn new(
        instance_id: impl Into<String>,
        step_id: impl Into<String>,
        status: StepStatus,
        data: Context,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            step_id: step_id.into(),
            status,
            data,
            occurred_at: Utc::now(),
        }
    }

    /// Build an event for the context's current step, snapshotting the context
    pub fn from_context(context: &Context, status: StepStatus) -> Self {
        Self::new(context.id(), context.step_id(), status, context.clone())
    }
}
