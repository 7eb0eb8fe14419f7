//! Expressions and terms.
use super::{
    delim::Delimited,
    ident::Ident,
    literal::{IntegerConstant, KeywordConstant, StringConstant},
    Parse, ParseError,
};
use crate::{
    token_stream::TokenStream,
    tokens::{Symbol, Token, TokenKind},
};

/// Sequence of terms joined by binary operators.
///
/// There is no operator precedence. Operators apply strictly from
/// left to right to the accumulated result and the next term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub first: Box<Term>,
    pub rest: Vec<(BinaryOp, Term)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Integer(IntegerConstant),
    String(StringConstant),
    Keyword(KeywordConstant),
    /// Parenthesized sub-expression.
    Paren(ParenExpr),
    Unary(UnaryExpr),
    /// Array element read, `a[i]`.
    Index(IndexExpr),
    Call(SubroutineCall),
    /// Bare variable reference.
    Var(Ident),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenExpr {
    pub left_paren: Token,
    pub expr: Box<Expression>,
    pub right_paren: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub term: Box<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexExpr {
    pub name: Ident,
    pub subscript: Subscript,
}

/// Bracketed array index, `[ expression ]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscript {
    pub left_bracket: Token,
    pub expr: Box<Expression>,
    pub right_bracket: Token,
}

/// Call of a function, constructor or method.
///
/// ```text
/// draw()             // method on the current object
/// game.run(1, 2)     // method on a variable
/// Math.max(a, b)     // function or constructor of a class
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineCall {
    /// Qualifier before the dot, either a variable or a class name.
    pub receiver: Option<CallReceiver>,
    pub name: Ident,
    pub left_paren: Token,
    pub args: ExpressionList,
    pub right_paren: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReceiver {
    pub name: Ident,
    pub dot: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionList {
    pub exprs: Delimited<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    pub token: Token,
    pub kind: BinOpKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinOpKind {
    #[rustfmt::skip]
    pub fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Plus    => Some(Self::Add),
            Symbol::Minus   => Some(Self::Sub),
            Symbol::Star    => Some(Self::Mul),
            Symbol::Slash   => Some(Self::Div),
            Symbol::Amp     => Some(Self::And),
            Symbol::Pipe    => Some(Self::Or),
            Symbol::Less    => Some(Self::Lt),
            Symbol::Greater => Some(Self::Gt),
            Symbol::Eq      => Some(Self::Eq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOp {
    pub token: Token,
    pub kind: UnaryOpKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    /// Arithmetic negation, `-`
    Neg,
    /// Bitwise not, `~`
    Not,
}

impl Parse for Expression {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let first = Box::new(Term::parse(input)?);
        let mut rest = vec![];

        while let Some(kind) = peek_binary_op(input) {
            let token = input.next_token().ok_or_else(|| input.unexpected("operator"))?;
            let term = Term::parse(input)?;
            rest.push((BinaryOp { token, kind }, term));
        }

        Ok(Expression { first, rest })
    }
}

fn peek_binary_op(input: &TokenStream) -> Option<BinOpKind> {
    match input.peek_kind() {
        Some(TokenKind::Symbol(symbol)) => BinOpKind::from_symbol(symbol),
        _ => None,
    }
}

impl Parse for Term {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        use Symbol as S;
        use TokenKind as T;

        match input.peek_kind() {
            Some(T::IntegerConstant) => IntegerConstant::parse(input).map(Term::Integer),
            Some(T::StringConstant) => StringConstant::parse(input).map(Term::String),
            Some(T::Keyword(_)) => KeywordConstant::parse(input).map(Term::Keyword),
            Some(T::Symbol(S::LeftParen)) => Ok(Term::Paren(ParenExpr {
                left_paren: input.consume_symbol(S::LeftParen)?,
                expr: Box::new(Expression::parse(input)?),
                right_paren: input.consume_symbol(S::RightParen)?,
            })),
            Some(T::Symbol(symbol @ (S::Minus | S::Tilde))) => {
                let kind = match symbol {
                    S::Minus => UnaryOpKind::Neg,
                    _ => UnaryOpKind::Not,
                };
                let token = input.consume_symbol(symbol)?;
                Ok(Term::Unary(UnaryExpr {
                    operator: UnaryOp { token, kind },
                    term: Box::new(Term::parse(input)?),
                }))
            }
            Some(T::Identifier) => {
                // One token of lookahead decides between the
                // identifier based alternatives.
                if input.is_symbol_at(1, S::LeftBracket) {
                    Ok(Term::Index(IndexExpr {
                        name: Ident::parse(input)?,
                        subscript: Subscript::parse(input)?,
                    }))
                } else if input.is_symbol_at(1, S::Dot) || input.is_symbol_at(1, S::LeftParen) {
                    SubroutineCall::parse(input).map(Term::Call)
                } else {
                    Ident::parse(input).map(Term::Var)
                }
            }
            _ => Err(input.unexpected("term").into()),
        }
    }
}

impl Parse for Subscript {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        Ok(Subscript {
            left_bracket: input.consume_symbol(Symbol::LeftBracket)?,
            expr: Box::new(Expression::parse(input)?),
            right_bracket: input.consume_symbol(Symbol::RightBracket)?,
        })
    }
}

impl Parse for SubroutineCall {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let receiver = if input.is_symbol_at(1, Symbol::Dot) {
            Some(CallReceiver {
                name: Ident::parse(input)?,
                dot: input.consume_symbol(Symbol::Dot)?,
            })
        } else {
            None
        };

        Ok(SubroutineCall {
            receiver,
            name: Ident::parse(input)?,
            left_paren: input.consume_symbol(Symbol::LeftParen)?,
            args: ExpressionList::parse(input)?,
            right_paren: input.consume_symbol(Symbol::RightParen)?,
        })
    }
}

impl Parse for ExpressionList {
    type Output = Self;
    type Err = ParseError;

    fn parse(input: &mut TokenStream) -> Result<Self, ParseError> {
        let exprs = Delimited::parse_with(input, |input| {
            if input.is_symbol_at(0, Symbol::RightParen) {
                Ok(None)
            } else {
                Expression::parse(input).map(Some)
            }
        })?;

        Ok(ExpressionList { exprs })
    }
}

impl ExpressionList {
    /// Number of explicitly written arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
