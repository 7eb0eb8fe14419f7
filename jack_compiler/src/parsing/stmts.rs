//! Statement parsing.
use super::{
    block::Block,
    expr::{Expression, SubroutineCall, Subscript},
    ident::Ident,
    Parse, ParseError,
};
use crate::{
    token_stream::TokenStream,
    tokens::{Keyword, Symbol, Token, TokenKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let(LetStatement),
    If(IfStatement),
    While(WhileStatement),
    Do(DoStatement),
    Return(ReturnStatement),
}

/// Assignment to a variable or array element.
///
/// # Example
///
/// ```text
/// let x = 1;
/// let a[i] = x + 1;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetStatement {
    pub keyword: Token,
    pub name: Ident,
    pub subscript: Option<Subscript>,
    pub eq: Token,
    pub value: Expression,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    pub keyword: Token,
    pub left_paren: Token,
    pub condition: Expression,
    pub right_paren: Token,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseBranch {
    pub keyword: Token,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStatement {
    pub keyword: Token,
    pub left_paren: Token,
    pub condition: Expression,
    pub right_paren: Token,
    pub body: Block,
}

/// Call whose result is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStatement {
    pub keyword: Token,
    pub call: SubroutineCall,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStatement {
    pub keyword: Token,
    pub value: Option<Expression>,
    pub semicolon: Token,
}

impl Statement {
    /// Indicates whether the keyword starts a statement.
    pub fn starts_with(keyword: Keyword) -> bool {
        matches!(
            keyword,
            Keyword::Let | Keyword::If | Keyword::While | Keyword::Do | Keyword::Return
        )
    }
}

impl Parse for Statement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        use Keyword as K;

        match input.peek_kind() {
            Some(TokenKind::Keyword(keyword)) => match keyword {
                K::Let => LetStatement::parse(input).map(Statement::Let),
                K::If => IfStatement::parse(input).map(Statement::If),
                K::While => WhileStatement::parse(input).map(Statement::While),
                K::Do => DoStatement::parse(input).map(Statement::Do),
                K::Return => ReturnStatement::parse(input).map(Statement::Return),
                _ => Err(input.unexpected("statement").into()),
            },
            _ => Err(input.unexpected("statement").into()),
        }
    }
}

impl Parse for LetStatement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_keyword(Keyword::Let)?;
        let name = Ident::parse(input)?;
        let subscript = if input.is_symbol_at(0, Symbol::LeftBracket) {
            Some(Subscript::parse(input)?)
        } else {
            None
        };

        Ok(LetStatement {
            keyword,
            name,
            subscript,
            eq: input.consume_symbol(Symbol::Eq)?,
            value: Expression::parse(input)?,
            semicolon: input.consume_symbol(Symbol::Semicolon)?,
        })
    }
}

impl Parse for IfStatement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_keyword(Keyword::If)?;
        let left_paren = input.consume_symbol(Symbol::LeftParen)?;
        let condition = Expression::parse(input)?;
        let right_paren = input.consume_symbol(Symbol::RightParen)?;
        let then_block = Block::parse(input)?;

        let else_branch = match input.match_token(TokenKind::Keyword(Keyword::Else)) {
            Some(keyword) => Some(ElseBranch {
                keyword,
                block: Block::parse(input)?,
            }),
            None => None,
        };

        Ok(IfStatement {
            keyword,
            left_paren,
            condition,
            right_paren,
            then_block,
            else_branch,
        })
    }
}

impl Parse for WhileStatement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Ok(WhileStatement {
            keyword: input.consume_keyword(Keyword::While)?,
            left_paren: input.consume_symbol(Symbol::LeftParen)?,
            condition: Expression::parse(input)?,
            right_paren: input.consume_symbol(Symbol::RightParen)?,
            body: Block::parse(input)?,
        })
    }
}

impl Parse for DoStatement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_keyword(Keyword::Do)?;

        // The call must start with an identifier, followed by
        // either a dot or the argument list.
        if input.peek_kind() != Some(TokenKind::Identifier) {
            return Err(input.unexpected("subroutine call").into());
        }

        Ok(DoStatement {
            keyword,
            call: SubroutineCall::parse(input)?,
            semicolon: input.consume_symbol(Symbol::Semicolon)?,
        })
    }
}

impl Parse for ReturnStatement {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let keyword = input.consume_keyword(Keyword::Return)?;
        let value = if input.is_symbol_at(0, Symbol::Semicolon) {
            None
        } else {
            Some(Expression::parse(input)?)
        };

        Ok(ReturnStatement {
            keyword,
            value,
            semicolon: input.consume_symbol(Symbol::Semicolon)?,
        })
    }
}
