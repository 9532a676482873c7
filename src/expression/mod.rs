//! Condition expression engine
//!
//! A condition string goes through three stages:
//! [`tokenize`] splits it into tokens, [`to_postfix`] reorders them with
//! operator precedence applied, and [`evaluate`] runs the postfix form
//! against a [`Context`](crate::core::Context).

pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use error::{ConditionError, EvalError, SyntaxError};
pub use evaluator::{evaluate, resolve_operand, Scalar};
pub use lexer::{tokenize, Operator, Token, TokenKind};
pub use parser::to_postfix;

use crate::core::condition::Condition;
use crate::core::context::Context;

/// Compile and evaluate a condition in one go
pub fn evaluate_condition(condition: &str, context: &Context) -> Result<bool, ConditionError> {
    let compiled = Condition::parse(condition)?;
    Ok(compiled.evaluate(context)?)
}
