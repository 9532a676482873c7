//! Structural validation errors

use crate::expression::SyntaxError;
use std::fmt;
use thiserror::Error;

/// What is wrong with a workflow or one of its steps
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("missing name for workflow")]
    MissingWorkflowName,

    #[error("missing steps for workflow")]
    MissingWorkflowSteps,

    #[error("invalid step type '{0}'")]
    UnknownStepType(String),

    #[error("missing {field} configuration for {step_type} step")]
    MissingPayload {
        step_type: &'static str,
        field: &'static str,
    },

    #[error("missing condition for {0}")]
    MissingCondition(&'static str),

    #[error("invalid condition for {block}: {source}")]
    InvalidCondition {
        block: &'static str,
        source: SyntaxError,
    },

    #[error("missing steps for {0}")]
    MissingSteps(&'static str),

    #[error("missing items or items_var for for-loop, at least one of them is required")]
    MissingItemsSource,

    #[error("for-loop sets both items and items_var, only one may supply the items")]
    AmbiguousItemsSource,

    #[error("missing loop_var or index_var for for-loop")]
    MissingLoopVariable,

    #[error("missing variable for switch")]
    MissingSwitchVariable,

    #[error("missing cases for switch")]
    MissingCases,

    #[error("missing value for case block")]
    MissingCaseValue,

    #[error("duplicate step id '{id}', first declared at {first_path}")]
    DuplicateStepId { id: String, first_path: String },

    #[error("missing required input {0}")]
    MissingRequiredInput(String),
}

/// One structural defect, located by its path in the document
///
/// Paths read like `steps[0].if.else_ifs[1].steps[2]`; workflow-level errors
/// use the path `workflow`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub step_id: Option<String>,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn workflow(kind: ValidationErrorKind) -> Self {
        Self {
            path: "workflow".to_string(),
            step_id: None,
            kind,
        }
    }

    /// An error located by path alone, with no step attached
    pub fn at(path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            step_id: None,
            kind,
        }
    }

    pub fn step(path: impl Into<String>, step_id: &str, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            step_id: (!step_id.is_empty()).then(|| step_id.to_string()),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.step_id {
            Some(id) => write!(f, "{} (step '{}'): {}", self.path, id, self.kind),
            None => write!(f, "{}: {}", self.path, self.kind),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every defect found in one validation pass, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Wrap a list of errors; `None` when the list is empty
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self(errors))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }

    /// Errors reported against the given step id
    pub fn for_step<'a>(&'a self, step_id: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0
            .iter()
            .filter(move |e| e.step_id.as_deref() == Some(step_id))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "error" } else { "errors" };
        write!(f, "{} validation {}", self.0.len(), noun)?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
