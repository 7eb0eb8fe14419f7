//! Syntactic analysis.
//!
//! Each grammar production has its own node type. Nodes keep the
//! tokens they consumed, including punctuation, so the derivation
//! can be replayed exactly by a visitor.
mod block;
mod delim;
mod expr;
mod func;
mod ident;
mod literal;
mod stmts;
mod ty;
mod unit;
mod visitor;

pub use block::*;
pub use delim::*;
pub use expr::*;
pub use func::*;
pub use ident::*;
pub use literal::*;
pub use stmts::*;
pub use ty::*;
pub use unit::*;
pub use visitor::*;

use crate::{
    token_stream::{TokenError, TokenStream},
    tokens::{Token, MAX_INT_CONSTANT},
};
use std::{error::Error, fmt};

pub trait Parse: Sized {
    type Output;
    type Err: Error;

    fn parse(input: &mut TokenStream) -> Result<Self::Output, Self::Err>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A production's required token is absent at the cursor.
    Token(TokenError),
    /// Integer literal outside of the stack machine's constant range.
    IntegerRange { token: Token },
    /// Tokens remain after the class definition.
    TrailingTokens { token: Token },
}

impl ParseError {
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseError::Token(TokenError::Mismatch { encountered, .. }) => Some(encountered),
            ParseError::Token(TokenError::EndOfSource { .. }) => None,
            ParseError::IntegerRange { token } => Some(token),
            ParseError::TrailingTokens { token } => Some(token),
        }
    }
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Token(err) => fmt::Display::fmt(err, f),
            ParseError::IntegerRange { token } => write!(
                f,
                "{}: integer constant {} exceeds maximum of {}",
                token.span, token.lexeme, MAX_INT_CONSTANT
            ),
            ParseError::TrailingTokens { token } => write!(
                f,
                "{}: unexpected token '{}' after end of class",
                token.span, token.lexeme
            ),
        }
    }
}

impl From<TokenError> for ParseError {
    fn from(err: TokenError) -> Self {
        ParseError::Token(err)
    }
}
