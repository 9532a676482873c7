//! Step domain model

use crate::core::condition::Condition;
use crate::core::config::StepDocument;
use crate::core::context::{Context, ContextError};
use crate::core::value::{nullable, Value};
use crate::expression::ConditionError;
use serde::{Deserialize, Serialize};

pub const STEP_TYPE_ACTION: &str = "Action";
pub const STEP_TYPE_PARALLEL: &str = "Parallel";
pub const STEP_TYPE_IF: &str = "If";
pub const STEP_TYPE_SWITCH: &str = "Switch";
pub const STEP_TYPE_FOR_LOOP: &str = "ForLoop";

/// A single node in a workflow's step tree
///
/// Serialized in the document form `{id, skip, type, <payload>}` where the
/// payload field (`action`, `parallel`, `if`, `switch`, `for`) matches `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StepDocument", into = "StepDocument")]
pub struct Step {
    /// Step identifier, unique within a workflow when set
    pub id: String,

    /// Whether the orchestrator should skip this step
    pub skip: bool,

    /// Variant-specific payload
    pub kind: StepKind,
}

/// The closed set of step variants
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    Action(ActionStep),
    Parallel(ParallelStep),
    If(IfStep),
    Switch(SwitchStep),
    ForLoop(ForLoopStep),
}

/// Leaf step invoking a registered action
///
/// An explicit `null` for any field reads the same as leaving it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub parameters: Vec<Parameter>,
    /// Output bindings copied back into the context
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<ResultBinding>,
}

/// Input to an action, either a literal `value` or a context variable `var`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub var: String,
}

/// Maps an action output to a context key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBinding {
    #[serde(default, deserialize_with = "nullable")]
    pub output_var: String,
    #[serde(default, deserialize_with = "nullable")]
    pub pipeline_var: String,
}

/// Children that run concurrently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParallelStep {
    pub steps: Vec<Step>,
}

/// If / else-if / else chain; at most one branch is taken
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IfStep {
    pub condition: String,
    pub steps: Vec<Step>,
    pub else_ifs: Vec<ElseIf>,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElseIf {
    pub condition: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElseBranch {
    pub steps: Vec<Step>,
}

/// Multi-way branch on the value of a context variable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchStep {
    pub variable: String,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Case {
    /// Value to match; required unless this is the default case
    pub value: Option<Value>,
    pub default: bool,
    pub steps: Vec<Step>,
}

/// Loop over inline `items` or the sequence stored under `items_var`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForLoopStep {
    pub loop_var: String,
    pub index_var: String,
    pub items_var: String,
    pub items: Vec<Value>,
    pub steps: Vec<Step>,
}

impl Step {
    /// Create a step that is not skipped
    pub fn new(id: impl Into<String>, kind: impl Into<StepKind>) -> Self {
        Self {
            id: id.into(),
            skip: false,
            kind: kind.into(),
        }
    }

    /// The document `type` tag for this step
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Every nested step list, in declaration order
    ///
    /// For an `If` that is the primary branch, then each else-if, then the
    /// else branch. For a `Switch`, one list per case.
    pub fn branches(&self) -> Vec<&[Step]> {
        match &self.kind {
            StepKind::Action(_) => Vec::new(),
            StepKind::Parallel(parallel) => vec![parallel.steps.as_slice()],
            StepKind::ForLoop(for_loop) => vec![for_loop.steps.as_slice()],
            StepKind::If(if_step) => {
                let mut branches = vec![if_step.steps.as_slice()];
                branches.extend(if_step.else_ifs.iter().map(|e| e.steps.as_slice()));
                if let Some(else_branch) = &if_step.else_branch {
                    branches.push(else_branch.steps.as_slice());
                }
                branches
            }
            StepKind::Switch(switch) => switch.cases.iter().map(|c| c.steps.as_slice()).collect(),
        }
    }

    /// Direct children across all branches
    pub fn children(&self) -> impl Iterator<Item = &Step> {
        self.branches().into_iter().flatten()
    }

    pub fn is_container(&self) -> bool {
        !matches!(self.kind, StepKind::Action(_))
    }
}

impl StepKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            StepKind::Action(_) => STEP_TYPE_ACTION,
            StepKind::Parallel(_) => STEP_TYPE_PARALLEL,
            StepKind::If(_) => STEP_TYPE_IF,
            StepKind::Switch(_) => STEP_TYPE_SWITCH,
            StepKind::ForLoop(_) => STEP_TYPE_FOR_LOOP,
        }
    }
}

impl From<ActionStep> for StepKind {
    fn from(step: ActionStep) -> Self {
        StepKind::Action(step)
    }
}

impl From<ParallelStep> for StepKind {
    fn from(step: ParallelStep) -> Self {
        StepKind::Parallel(step)
    }
}

impl From<IfStep> for StepKind {
    fn from(step: IfStep) -> Self {
        StepKind::If(step)
    }
}

impl From<SwitchStep> for StepKind {
    fn from(step: SwitchStep) -> Self {
        StepKind::Switch(step)
    }
}

impl From<ForLoopStep> for StepKind {
    fn from(step: ForLoopStep) -> Self {
        StepKind::ForLoop(step)
    }
}

impl IfStep {
    /// Pick the steps to run next
    ///
    /// Conditions are tried in declared order (the `if`, then each else-if);
    /// the first that holds wins. Falls back to the else branch, or `None`.
    /// Evaluation stops at the first failing condition.
    pub fn select_branch(&self, context: &Context) -> Result<Option<&[Step]>, ConditionError> {
        if Condition::parse(&self.condition)?.evaluate(context)? {
            return Ok(Some(self.steps.as_slice()));
        }
        for else_if in &self.else_ifs {
            if Condition::parse(&else_if.condition)?.evaluate(context)? {
                return Ok(Some(else_if.steps.as_slice()));
            }
        }
        Ok(self.else_branch.as_ref().map(|e| e.steps.as_slice()))
    }
}

impl SwitchStep {
    /// Pick the case matching the current value of `variable`
    ///
    /// Non-default cases are compared with plain value equality, so a string
    /// never matches a number. Without a match the first default case is used.
    pub fn select_case(&self, context: &Context) -> Result<Option<&Case>, ContextError> {
        let current = context.get(&self.variable)?;

        let matched = self
            .cases
            .iter()
            .filter(|c| !c.default)
            .find(|c| c.value.as_ref() == Some(current));

        Ok(matched.or_else(|| self.cases.iter().find(|c| c.default)))
    }

    pub fn default_case(&self) -> Option<&Case> {
        self.cases.iter().find(|c| c.default)
    }
}

impl ForLoopStep {
    /// The items to iterate over
    ///
    /// `items_var` takes the sequence from the context; otherwise the inline
    /// `items` are used.
    pub fn resolve_items(&self, context: &Context) -> Result<Vec<Value>, ContextError> {
        if self.items_var.is_empty() {
            return Ok(self.items.clone());
        }

        let value = context.get(&self.items_var)?;
        value
            .as_sequence()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| ContextError::InvalidType {
                key: self.items_var.clone(),
                expected: "sequence",
                found: value.type_name(),
            })
    }

    /// Store the current item and index under `loop_var` / `index_var`
    pub fn bind_iteration(&self, context: &mut Context, index: usize, item: &Value) {
        if !self.loop_var.is_empty() {
            context.set(self.loop_var.clone(), item.clone());
        }
        if !self.index_var.is_empty() {
            context.set(self.index_var.clone(), Value::Number(index as f64));
        }
    }
}
