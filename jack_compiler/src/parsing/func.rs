use super::{
    block::Statements,
    delim::Delimited,
    ident::Ident,
    ty::{ReturnType, TypeName},
    Parse, ParseError,
};
use crate::{
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, Token, TokenKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineDec {
    pub keyword: Token,
    pub kind: SubroutineKind,
    pub return_type: ReturnType,
    pub name: Ident,
    pub left_paren: Token,
    pub params: ParameterList,
    pub right_paren: Token,
    pub body: SubroutineBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Constructor => Some(SubroutineKind::Constructor),
            Keyword::Function => Some(SubroutineKind::Function),
            Keyword::Method => Some(SubroutineKind::Method),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    pub params: Delimited<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeName,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineBody {
    pub left_brace: Token,
    pub vars: Vec<VarDec>,
    pub statements: Statements,
    pub right_brace: Token,
}

/// Local variable declaration.
///
/// # Example
///
/// ```text
/// var int x, y;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDec {
    pub keyword: Token,
    pub ty: TypeName,
    pub names: Delimited<Ident>,
    pub semicolon: Token,
}

impl SubroutineBody {
    /// Total number of locals declared across all declarations.
    pub fn local_count(&self) -> usize {
        self.vars.iter().map(|dec| dec.names.len()).sum()
    }
}

impl Parse for SubroutineDec {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let kind = match input.peek_kind() {
            Some(TokenKind::Keyword(keyword)) => SubroutineKind::from_keyword(keyword),
            _ => None,
        };
        let kind = kind.ok_or_else(|| input.unexpected("'constructor', 'function' or 'method'"))?;
        let keyword = input.next_token().ok_or_else(|| input.unexpected("subroutine"))?;

        Ok(SubroutineDec {
            keyword,
            kind,
            return_type: ReturnType::parse(input)?,
            name: Ident::parse(input)?,
            left_paren: input.consume_symbol(Symbol::LeftParen)?,
            params: ParameterList::parse(input)?,
            right_paren: input.consume_symbol(Symbol::RightParen)?,
            body: SubroutineBody::parse(input)?,
        })
    }
}

impl Parse for ParameterList {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Ok(ParameterList {
            params: Delimited::<Parameter>::parse(input)?,
        })
    }
}

/// Parse one parameter definition.
///
/// Allowed to fail because the lookahead is here and not in the delimiter list.
impl Parse for Parameter {
    type Output = Option<Self>;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Option<Self>, ParseError> {
        if !input.peek().map_or(false, TypeName::starts_with) {
            return Ok(None);
        }

        Ok(Some(Parameter {
            ty: TypeName::parse(input)?,
            name: Ident::parse(input)?,
        }))
    }
}

impl Parse for SubroutineBody {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let left_brace = input.consume_symbol(Symbol::LeftBrace)?;

        let mut vars = vec![];
        while input.is_keyword(Keyword::Var) {
            vars.push(VarDec::parse(input)?);
        }

        Ok(SubroutineBody {
            left_brace,
            vars,
            statements: Statements::parse(input)?,
            right_brace: input.consume_symbol(Symbol::RightBrace)?,
        })
    }
}

impl Parse for VarDec {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Ok(VarDec {
            keyword: input.consume_keyword(Keyword::Var)?,
            ty: TypeName::parse(input)?,
            names: Delimited::parse_with(input, |input| Ident::parse(input).map(Some))?,
            semicolon: input.consume_symbol(Symbol::Semicolon)?,
        })
    }
}
