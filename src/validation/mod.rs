//! Structural validation of workflows and step trees
//!
//! Validation runs over the whole tree and reports every defect it finds,
//! each located by a document path and, where the step has one, its id.

pub mod error;
pub mod inputs;
pub mod validator;

pub use error::{ValidationError, ValidationErrorKind, ValidationErrors};
pub use inputs::validate_inputs;
pub use validator::{validate, validate_step};
