//! Compiled condition model

use crate::core::context::Context;
use crate::expression::{evaluate, to_postfix, tokenize, EvalError, SyntaxError, Token};
use std::fmt;
use tracing::{debug, trace};

/// A condition string already reduced to postfix form
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    postfix: Vec<Token>,
}

impl Condition {
    /// Tokenize and convert a condition string
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let postfix = to_postfix(tokenize(source))?;
        trace!(condition = source, tokens = postfix.len(), "Compiled condition");
        Ok(Self {
            source: source.to_string(),
            postfix,
        })
    }

    /// Condition text as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokens in evaluation order
    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// Evaluate against a context without modifying it
    pub fn evaluate(&self, context: &Context) -> Result<bool, EvalError> {
        let result = evaluate(&self.postfix, context);
        match &result {
            Ok(value) => debug!(condition = %self.source, result = value, "Evaluated condition"),
            Err(e) => debug!(condition = %self.source, error = %e, "Condition evaluation failed"),
        }
        result
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
