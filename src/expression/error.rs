//! Expression engine errors

use thiserror::Error;

/// Structural problems found while converting an expression to postfix
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expression is empty")]
    EmptyExpression,

    #[error("mismatched parentheses: ')' at position {position} has no matching '('")]
    UnmatchedClose { position: usize },

    #[error("mismatched parentheses: '(' at position {position} is never closed")]
    UnclosedOpen { position: usize },
}

/// Failures while evaluating a postfix expression against a context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown variable '{name}' at position {position}")]
    UnknownVariable { name: String, position: usize },

    #[error("type mismatch at position {position}: {message}")]
    TypeMismatch { message: String, position: usize },

    #[error("malformed expression: {0}")]
    MalformedExpression(String),
}

/// Any failure from compiling or evaluating a condition string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("syntax error in condition: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("evaluation error in condition: {0}")]
    Eval(#[from] EvalError),
}
