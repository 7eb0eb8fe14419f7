//! Delimited list.
use super::{Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Symbol, Token, TokenKind},
};

/// Comma separated list of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited<T> {
    pub items: Vec<DelimitedItem<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedItem<T> {
    pub item: T,
    /// Trailing comma, absent on the last item.
    pub comma: Option<Token>,
}

impl<T> Delimited<T> {
    /// Parse a list using the given item parser.
    ///
    /// The item parser performs the lookahead for the first item,
    /// returning `None` if the list is empty. After a comma an item
    /// is mandatory.
    pub fn parse_with<F>(input: &mut TokenStream, mut parse_item: F) -> Result<Self, ParseError>
    where
        F: FnMut(&mut TokenStream) -> Result<Option<T>, ParseError>,
    {
        let mut items = vec![];

        if let Some(first) = parse_item(input)? {
            let mut item = first;
            loop {
                let comma = input.match_token(TokenKind::Symbol(Symbol::Comma));
                let more = comma.is_some();
                items.push(DelimitedItem { item, comma });

                if !more {
                    break;
                }

                item = match parse_item(input)? {
                    Some(item) => item,
                    None => return Err(input.unexpected("list item after ','").into()),
                };
            }
        }

        Ok(Delimited { items })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|delimited| &delimited.item)
    }
}

impl<T> Parse for Delimited<T>
where
    T: Parse<Output = Option<T>, Err = ParseError>,
{
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Self::parse_with(input, T::parse)
    }
}
