//! Checks that a context supplies an action's required inputs

use crate::core::action::ActionSpec;
use crate::core::context::Context;
use crate::validation::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use tracing::debug;

/// Check that every required parameter of `spec` is present in `context`
///
/// Reports one error per missing parameter, located at `parameters[i]`.
/// A key holding `null` counts as present.
pub fn validate_inputs(spec: &ActionSpec, context: &Context) -> Result<(), ValidationErrors> {
    let errors: Vec<ValidationError> = spec
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, parameter)| parameter.required && !context.has(&parameter.name))
        .map(|(i, parameter)| {
            ValidationError::at(
                format!("parameters[{}]", i),
                ValidationErrorKind::MissingRequiredInput(parameter.name.clone()),
            )
        })
        .collect();

    debug!(
        action = %spec.id,
        missing = errors.len(),
        "Checked action inputs"
    );
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}
