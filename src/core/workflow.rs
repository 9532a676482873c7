//! Workflow domain model and step-tree traversal

use crate::core::config::WorkflowDocument;
use crate::core::step::Step;
use crate::validation::{self, ValidationErrors};
use serde::{Deserialize, Serialize};

/// A workflow definition: metadata plus an ordered list of top-level steps
///
/// The workflow owns its whole step tree. Steps hold no parent links;
/// use [`find_parent`] to recover them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDocument", into = "WorkflowDocument")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub version: i64,
    pub description: String,
    pub steps: Vec<Step>,
}

impl Workflow {
    /// Check the structure of the whole step tree
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate(self)
    }

    /// Find a step anywhere in the tree
    pub fn step(&self, id: &str) -> Option<&Step> {
        find_step_by_id(id, self)
    }

    /// Every step in the tree, depth-first in declaration order
    pub fn iter_steps(&self) -> StepIter<'_> {
        StepIter::new(&self.steps)
    }
}

/// Pre-order iterator over a step forest
pub struct StepIter<'a> {
    stack: Vec<&'a Step>,
}

impl<'a> StepIter<'a> {
    pub fn new(steps: &'a [Step]) -> Self {
        Self {
            stack: steps.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for StepIter<'a> {
    type Item = &'a Step;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.stack.pop()?;
        let children: Vec<&'a Step> = step.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(step)
    }
}

/// Find the first step with the given id
///
/// Searches depth-first in declaration order and descends into every
/// branch: parallel and loop bodies, the if branch, each else-if, the else
/// branch and every switch case.
pub fn find_step_by_id<'a>(id: &str, workflow: &'a Workflow) -> Option<&'a Step> {
    search_steps(id, &workflow.steps)
}

/// [`find_step_by_id`] over an arbitrary step list
///
/// An empty id never matches, even when the tree holds anonymous steps.
pub fn search_steps<'a>(id: &str, steps: &'a [Step]) -> Option<&'a Step> {
    if id.is_empty() {
        return None;
    }
    StepIter::new(steps).find(|step| step.id == id)
}

/// All steps nested under `step`, depth-first in declaration order
///
/// Covers every branch of every container. The step itself is not included.
pub fn collect_descendants(step: &Step) -> Vec<&Step> {
    step.branches()
        .into_iter()
        .flat_map(StepIter::new)
        .collect()
}

/// Descendants of the step with the given id; empty if there is no such step
pub fn descendants_by_id<'a>(id: &str, workflow: &'a Workflow) -> Vec<&'a Step> {
    find_step_by_id(id, workflow)
        .map(collect_descendants)
        .unwrap_or_default()
}

/// The container step whose branches directly hold the step with the given id
///
/// `None` for top-level steps, unknown ids and the empty id.
pub fn find_parent<'a>(id: &str, workflow: &'a Workflow) -> Option<&'a Step> {
    if id.is_empty() {
        return None;
    }
    workflow
        .iter_steps()
        .find(|candidate| candidate.children().any(|child| child.id == id))
}
