use super::{stmts::Statement, Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Symbol, Token, TokenKind},
};

/// Sequence of zero or more statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    pub stmts: Vec<Statement>,
}

/// Statements surrounded by braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub left_brace: Token,
    pub statements: Statements,
    pub right_brace: Token,
}

impl Parse for Statements {
    type Output = Self;
    type Err = ParseError;

    /// Parses statements until the first token that is not a
    /// statement keyword.
    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let mut stmts = vec![];

        while let Some(TokenKind::Keyword(keyword)) = input.peek_kind() {
            if !Statement::starts_with(keyword) {
                break;
            }
            stmts.push(Statement::parse(input)?);
        }

        Ok(Self { stmts })
    }
}

impl Parse for Block {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Ok(Block {
            left_brace: input.consume_symbol(Symbol::LeftBrace)?,
            statements: Statements::parse(input)?,
            right_brace: input.consume_symbol(Symbol::RightBrace)?,
        })
    }
}
