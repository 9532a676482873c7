//! Infix to postfix conversion (shunting-yard)

use crate::expression::error::SyntaxError;
use crate::expression::lexer::{Token, TokenKind};

/// Reorder tokens into postfix (RPN) order
///
/// All operators are binary and left-associative: an incoming operator pops
/// every stacked operator of greater or equal precedence. Parentheses are
/// consumed and never appear in the output.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Operator(op) => {
                while let Some(top) = stack.last() {
                    match top.kind {
                        TokenKind::Operator(stacked) if stacked.precedence() >= op.precedence() => {
                            if let Some(popped) = stack.pop() {
                                output.push(popped);
                            }
                        }
                        _ => break,
                    }
                }
                stack.push(token);
            }
            TokenKind::LeftParen => stack.push(token),
            TokenKind::RightParen => loop {
                match stack.pop() {
                    Some(Token { kind: TokenKind::LeftParen, .. }) => break,
                    Some(popped) => output.push(popped),
                    None => {
                        return Err(SyntaxError::UnmatchedClose {
                            position: token.position,
                        })
                    }
                }
            },
            TokenKind::Operand(_) | TokenKind::Unknown(_) => output.push(token),
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind == TokenKind::LeftParen {
            return Err(SyntaxError::UnclosedOpen {
                position: top.position,
            });
        }
        output.push(top);
    }

    Ok(output)
}
