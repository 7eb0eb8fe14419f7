//! Compilation unit.
use super::{delim::Delimited, func::SubroutineDec, ident::Ident, ty::TypeName, Parse, ParseError};
use crate::{
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, Token, TokenKind},
};

/// Class definition, the root of every compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub keyword: Token,
    pub name: Ident,
    pub left_brace: Token,
    pub vars: Vec<ClassVarDec>,
    pub subroutines: Vec<SubroutineDec>,
    pub right_brace: Token,
}

/// Static or field declaration.
///
/// # Example
///
/// ```text
/// field int x, y;
/// static boolean debug;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVarDec {
    pub keyword: Token,
    pub kind: ClassVarKind,
    pub ty: TypeName,
    pub names: Delimited<Ident>,
    pub semicolon: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVarKind {
    Static,
    Field,
}

impl Parse for Class {
    type Output = Self;
    type Err = ParseError;

    /// Parse the whole unit.
    ///
    /// The class must be the only definition in the stream.
    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_keyword(Keyword::Class)?;
        let name = Ident::parse(input)?;
        let left_brace = input.consume_symbol(Symbol::LeftBrace)?;

        let mut vars = vec![];
        while input.is_keyword(Keyword::Static) || input.is_keyword(Keyword::Field) {
            vars.push(ClassVarDec::parse(input)?);
        }

        let mut subroutines = vec![];
        while input.is_keyword(Keyword::Constructor)
            || input.is_keyword(Keyword::Function)
            || input.is_keyword(Keyword::Method)
        {
            subroutines.push(SubroutineDec::parse(input)?);
        }

        let right_brace = input.consume_symbol(Symbol::RightBrace)?;

        if let Some(token) = input.next_token() {
            return Err(ParseError::TrailingTokens { token });
        }

        Ok(Class {
            keyword,
            name,
            left_brace,
            vars,
            subroutines,
            right_brace,
        })
    }
}

impl Parse for ClassVarDec {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_any(&[
            TokenKind::Keyword(Keyword::Static),
            TokenKind::Keyword(Keyword::Field),
        ])?;
        let kind = if keyword.is_keyword(Keyword::Static) {
            ClassVarKind::Static
        } else {
            ClassVarKind::Field
        };

        Ok(ClassVarDec {
            keyword,
            kind,
            ty: TypeName::parse(input)?,
            names: Delimited::parse_with(input, |input| Ident::parse(input).map(Some))?,
            semicolon: input.consume_symbol(Symbol::Semicolon)?,
        })
    }
}
