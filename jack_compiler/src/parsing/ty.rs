//! Type annotations.
use super::{ident::Ident, Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Keyword, Token, TokenKind},
};
use smol_str::SmolStr;

/// Declared type of a variable, parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Int(Token),
    Char(Token),
    Boolean(Token),
    /// User defined, or library, class name.
    Class(Ident),
}

impl TypeName {
    pub fn token(&self) -> &Token {
        match self {
            TypeName::Int(token) | TypeName::Char(token) | TypeName::Boolean(token) => token,
            TypeName::Class(ident) => &ident.token,
        }
    }

    pub fn name(&self) -> SmolStr {
        self.token().lexeme.clone()
    }

    /// Indicates whether the token can start a type.
    pub fn starts_with(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean)
                | TokenKind::Identifier
        )
    }
}

impl Parse for TypeName {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        use Keyword as K;
        use TokenKind as T;

        match input.peek_kind() {
            Some(T::Keyword(K::Int)) => Ok(TypeName::Int(input.consume_keyword(K::Int)?)),
            Some(T::Keyword(K::Char)) => Ok(TypeName::Char(input.consume_keyword(K::Char)?)),
            Some(T::Keyword(K::Boolean)) => {
                Ok(TypeName::Boolean(input.consume_keyword(K::Boolean)?))
            }
            Some(T::Identifier) => Ident::parse(input).map(TypeName::Class),
            _ => Err(input.unexpected("type").into()),
        }
    }
}

/// Subroutine return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void(Token),
    Type(TypeName),
}

impl ReturnType {
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnType::Void(_))
    }

    pub fn token(&self) -> &Token {
        match self {
            ReturnType::Void(token) => token,
            ReturnType::Type(ty) => ty.token(),
        }
    }
}

impl Parse for ReturnType {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        match input.match_token(TokenKind::Keyword(Keyword::Void)) {
            Some(token) => Ok(ReturnType::Void(token)),
            None => TypeName::parse(input).map(ReturnType::Type),
        }
    }
}
