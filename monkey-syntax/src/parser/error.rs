use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got EOF instead")]
    PrematureEndOfInput { expected: Expected },
    #[error("expected next token to be {expected}, got {} instead", .got.kind)]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("could not parse {0} as integer")]
    InvalidInteger(Rc<str>),
    #[error("no prefix parse function for {} found", .0.kind)]
    NoPrefixFunction(Token),
    #[error("illegal token: {0}")]
    IllegalToken(Rc<str>),
}

#[derive(Debug, PartialEq)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "IDENT"),
            Expected::Expression => write!(f, "an expression"),
        }
    }
}

impl ParseError {
    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Option<Token>) -> ParseError {
        Self::unexpected_other(Expected::Token(expected), got)
    }

    pub fn unexpected_other(expected: Expected, got: Option<Token>) -> ParseError {
        match got {
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => ParseError::PrematureEndOfInput { expected },
        }
    }

    /// Byte offset of the offending token, when there is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { got, .. } | ParseError::NoPrefixFunction(got) => {
                Some(got.start)
            }
            _ => None,
        }
    }
}
