//! Postfix evaluation against a context

use crate::core::context::Context;
use crate::core::value::Value;
use crate::expression::error::EvalError;
use crate::expression::lexer::{Operator, Token, TokenKind};
use std::fmt;

/// Values an expression can produce or compare
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Number(_) => "number",
            Scalar::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "\"{}\"", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Evaluate a postfix token sequence to a boolean
///
/// Both operands of `&&`/`||` are always evaluated; there is no
/// short-circuiting once the expression is in postfix form.
pub fn evaluate(postfix: &[Token], context: &Context) -> Result<bool, EvalError> {
    let mut stack: Vec<Scalar> = Vec::new();

    for token in postfix {
        match &token.kind {
            TokenKind::Operand(text) => stack.push(resolve_operand(text, token.position, context)?),
            TokenKind::Operator(op) => {
                let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                    return Err(EvalError::MalformedExpression(format!(
                        "operator '{}' at position {} needs two operands",
                        op, token.position
                    )));
                };
                stack.push(Scalar::Bool(apply(*op, left, right, token.position)?));
            }
            TokenKind::Unknown(symbol) => {
                return Err(EvalError::MalformedExpression(format!(
                    "unknown operator '{}' at position {}",
                    symbol, token.position
                )))
            }
            TokenKind::LeftParen | TokenKind::RightParen => {
                return Err(EvalError::MalformedExpression(format!(
                    "unexpected parenthesis at position {}",
                    token.position
                )))
            }
        }
    }

    match stack.len() {
        1 => match stack.pop() {
            Some(Scalar::Bool(result)) => Ok(result),
            Some(other) => Err(EvalError::TypeMismatch {
                message: format!(
                    "expression produced {} {}, expected a boolean",
                    other.type_name(),
                    other
                ),
                position: postfix.last().map(|t| t.position).unwrap_or_default(),
            }),
            None => Err(EvalError::MalformedExpression("expression produced no value".to_string())),
        },
        0 => Err(EvalError::MalformedExpression("expression produced no value".to_string())),
        n => Err(EvalError::MalformedExpression(format!(
            "expression left {} values, expected one",
            n
        ))),
    }
}

fn apply(op: Operator, left: Scalar, right: Scalar, position: usize) -> Result<bool, EvalError> {
    match op {
        Operator::And | Operator::Or => match (&left, &right) {
            (Scalar::Bool(a), Scalar::Bool(b)) => match op {
                Operator::And => Ok(*a && *b),
                _ => Ok(*a || *b),
            },
            _ => Err(mismatch(op, &left, &right, "booleans", position)),
        },
        // Values of different types are simply unequal
        Operator::Eq => Ok(left == right),
        Operator::Ne => Ok(left != right),
        Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => match (&left, &right) {
            (Scalar::Number(a), Scalar::Number(b)) => Ok(match op {
                Operator::Lt => a < b,
                Operator::Gt => a > b,
                Operator::Le => a <= b,
                _ => a >= b,
            }),
            _ => Err(mismatch(op, &left, &right, "numbers", position)),
        },
    }
}

fn mismatch(
    op: Operator,
    left: &Scalar,
    right: &Scalar,
    expected: &str,
    position: usize,
) -> EvalError {
    EvalError::TypeMismatch {
        message: format!(
            "'{}' expects {}, found {} and {}",
            op,
            expected,
            left.type_name(),
            right.type_name()
        ),
        position,
    }
}

/// Turn an operand token into a value
///
/// Quoted text is a string literal, then a decimal number, then a context
/// key. A key that looks like a number is therefore never looked up.
pub fn resolve_operand(
    text: &str,
    position: usize,
    context: &Context,
) -> Result<Scalar, EvalError> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Ok(Scalar::String(text[1..text.len() - 1].to_string()));
    }

    if let Some(number) = parse_number(text) {
        return Ok(Scalar::Number(number));
    }

    match context.get(text) {
        Ok(Value::String(s)) => Ok(Scalar::String(s.clone())),
        Ok(Value::Number(n)) => Ok(Scalar::Number(*n)),
        Ok(Value::Bool(b)) => Ok(Scalar::Bool(*b)),
        Ok(other) => Err(EvalError::TypeMismatch {
            message: format!("variable '{}' holds a {}, not a scalar", text, other.type_name()),
            position,
        }),
        Err(_) => Err(EvalError::UnknownVariable {
            name: text.to_string(),
            position,
        }),
    }
}

/// Parse a decimal literal: optional sign, digits, optional fraction and exponent
fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let starts_numeric = match unsigned.as_bytes() {
        [first, ..] if first.is_ascii_digit() => true,
        [b'.', second, ..] => second.is_ascii_digit(),
        _ => false,
    };
    if !starts_numeric {
        return None;
    }
    text.parse::<f64>().ok()
}
