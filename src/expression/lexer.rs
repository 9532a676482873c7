//! Condition tokenizer

use std::fmt;

/// Binary operators understood by the condition language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Gt
            | Operator::Le
            | Operator::Ge => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }

    fn from_pair(first: char, second: char) -> Option<Self> {
        match (first, second) {
            ('&', '&') => Some(Operator::And),
            ('|', '|') => Some(Operator::Or),
            ('=', '=') => Some(Operator::Eq),
            ('!', '=') => Some(Operator::Ne),
            ('<', '=') => Some(Operator::Le),
            ('>', '=') => Some(Operator::Ge),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What a token is
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Operator(Operator),
    LeftParen,
    RightParen,
    /// String literal (still quoted), numeric literal or identifier
    Operand(String),
    /// A symbol that starts no known operator, e.g. a lone `&`
    Unknown(String),
}

/// A token plus the character offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
            TokenKind::Operand(text) | TokenKind::Unknown(text) => f.write_str(text),
        }
    }
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '&' | '|' | '=' | '!' | '<' | '>' | '(' | ')')
}

/// Split a condition string into tokens
///
/// Two-character operators are matched before their one-character
/// prefixes. Quoted literals are kept whole, including any spaces or
/// operator characters inside them. Never fails: bad input surfaces later
/// as a syntax or evaluation error.
pub fn tokenize(condition: &str) -> Vec<Token> {
    let chars: Vec<char> = condition.chars().collect();
    let mut tokens = Vec::new();
    let mut pending = String::new();
    let mut pending_start = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch.is_whitespace() {
            flush(&mut tokens, &mut pending, pending_start);
            i += 1;
            continue;
        }

        if ch == '"' {
            if pending.is_empty() {
                pending_start = i;
            }
            pending.push(ch);
            i += 1;
            while i < chars.len() {
                pending.push(chars[i]);
                i += 1;
                if chars[i - 1] == '"' {
                    break;
                }
            }
            continue;
        }

        if is_operator_char(ch) {
            flush(&mut tokens, &mut pending, pending_start);

            if let Some(op) = chars.get(i + 1).and_then(|&next| Operator::from_pair(ch, next)) {
                tokens.push(Token::new(TokenKind::Operator(op), i));
                i += 2;
                continue;
            }

            let kind = match ch {
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '<' => TokenKind::Operator(Operator::Lt),
                '>' => TokenKind::Operator(Operator::Gt),
                other => TokenKind::Unknown(other.to_string()),
            };
            tokens.push(Token::new(kind, i));
            i += 1;
            continue;
        }

        if pending.is_empty() {
            pending_start = i;
        }
        pending.push(ch);
        i += 1;
    }

    flush(&mut tokens, &mut pending, pending_start);
    tokens
}

fn flush(tokens: &mut Vec<Token>, pending: &mut String, start: usize) {
    if !pending.is_empty() {
        tokens.push(Token::new(TokenKind::Operand(std::mem::take(pending)), start));
    }
}
