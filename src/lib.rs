//! orcaloop - condition expressions and step trees for workflow orchestration

pub mod cli;
pub mod core;
pub mod expression;
pub mod validation;

// Re-export commonly used types
pub use crate::core::config::{load_workflow, parse_workflow_yaml, WorkflowDocument};
pub use crate::core::{
    collect_descendants, find_step_by_id, ActionSpec, Condition, Context, ContextError, Step,
    StepKind, StepStatus, Value, Workflow,
};
pub use expression::{evaluate_condition, ConditionError, EvalError, SyntaxError};
pub use validation::{
    validate, validate_inputs, ValidationError, ValidationErrorKind, ValidationErrors,
};
