//! Literal values.
use super::{Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Keyword, Token, TokenKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerConstant {
    pub token: Token,
    pub value: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringConstant {
    pub token: Token,
    /// Content without the surrounding quotes.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordConstant {
    pub token: Token,
    pub value: KeywordValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordValue {
    True,
    False,
    Null,
    This,
}

impl KeywordValue {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::True => Some(KeywordValue::True),
            Keyword::False => Some(KeywordValue::False),
            Keyword::Null => Some(KeywordValue::Null),
            Keyword::This => Some(KeywordValue::This),
            _ => None,
        }
    }
}

impl Parse for IntegerConstant {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let token = input.consume(TokenKind::IntegerConstant)?;
        match token.int_value() {
            Some(value) => Ok(IntegerConstant { token, value }),
            None => Err(ParseError::IntegerRange { token }),
        }
    }
}

impl Parse for StringConstant {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let token = input.consume(TokenKind::StringConstant)?;
        let value = token.string_value().unwrap_or_default().to_owned();
        Ok(StringConstant { token, value })
    }
}

impl Parse for KeywordConstant {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let value = match input.peek_kind() {
            Some(TokenKind::Keyword(keyword)) => KeywordValue::from_keyword(keyword),
            _ => None,
        };

        match value {
            Some(value) => {
                let token = input.next_token().ok_or_else(|| input.unexpected("keyword constant"))?;
                Ok(KeywordConstant { token, value })
            }
            None => Err(input.unexpected("keyword constant").into()),
        }
    }
}
