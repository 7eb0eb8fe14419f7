use super::{Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Token, TokenKind},
};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub token: Token,
    pub name: SmolStr,
}

impl Parse for Ident {
    type Output = Self;
    type Err = ParseError;

    #[inline]
    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let token = input.consume(TokenKind::Identifier)?;
        let name = token.lexeme.clone();
        Ok(Ident { token, name })
    }
}
