//! Buffered stream of tokens for look ahead.
use crate::{
    lex::{tokenize, LexError},
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};

use itertools::Itertools;
use std::{error, fmt};

/// Fully lexed sequence of tokens with a cursor.
///
/// The lexer runs to completion before parsing starts, so
/// the stream can look ahead arbitrarily far. Peeking is a pure
/// read relative to the cursor; only the consuming methods
/// advance it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    #[inline]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Lex the given source into a new stream.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        tokenize(source).map(Self::new)
    }

    /// All tokens in the stream, regardless of cursor position.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the token the cursor points at.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Return the current token without advancing the cursor.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// Look ahead `n` tokens past the current token, without
    /// advancing the cursor.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    /// Return the current token kind without advancing the cursor.
    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Test whether the token `n` positions ahead is the given symbol.
    #[inline]
    pub fn is_symbol_at(&self, n: usize, symbol: Symbol) -> bool {
        self.peek_nth(n).map_or(false, |token| token.is_symbol(symbol))
    }

    /// Test whether the current token is the given keyword.
    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.peek().map_or(false, |token| token.is_keyword(keyword))
    }

    /// The most recently consumed token.
    pub fn previous_token(&self) -> Option<&Token> {
        self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Consumes the current token regardless of type.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    /// Consumes the current token if it matches the given token kind.
    ///
    /// Does not consume the token if the kinds do not match.
    pub fn match_token(&mut self, token_kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(token_kind) {
            self.next_token()
        } else {
            None
        }
    }

    /// Return the current token and advance the cursor.
    ///
    /// The consumed token must match the given token kind, otherwise
    /// a [`TokenError`] is returned and the cursor is not advanced.
    pub fn consume(&mut self, token_kind: TokenKind) -> Result<Token, TokenError> {
        self.consume_any(&[token_kind])
    }

    #[inline]
    pub fn consume_symbol(&mut self, symbol: Symbol) -> Result<Token, TokenError> {
        self.consume(TokenKind::Symbol(symbol))
    }

    #[inline]
    pub fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token, TokenError> {
        self.consume(TokenKind::Keyword(keyword))
    }

    /// Consume the current token if it matches any of the given kinds.
    pub fn consume_any(&mut self, token_kinds: &[TokenKind]) -> Result<Token, TokenError> {
        match self.peek() {
            Some(token) if token_kinds.contains(&token.kind) => {}
            Some(token) => {
                return Err(TokenError::Mismatch {
                    expected: Expected::from(token_kinds),
                    encountered: token.clone(),
                })
            }
            None => return Err(self.end_of_source(token_kinds)),
        }

        self.next_token().ok_or_else(|| self.end_of_source(token_kinds))
    }

    /// Build a mismatch error against the current token, for
    /// productions that expect something other than a single kind.
    pub fn unexpected(&self, expected: &'static str) -> TokenError {
        match self.peek() {
            Some(token) => TokenError::Mismatch {
                expected: Expected::Rule(expected),
                encountered: token.clone(),
            },
            None => TokenError::EndOfSource {
                expected: Expected::Rule(expected),
                span: self.previous_token().map(|token| token.span),
            },
        }
    }

    fn end_of_source(&self, token_kinds: &[TokenKind]) -> TokenError {
        TokenError::EndOfSource {
            expected: Expected::from(token_kinds),
            span: self.previous_token().map(|token| token.span),
        }
    }
}

/// Description of what a production required at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Tokens(Vec<TokenKind>),
    /// Named grammar rule, like "type" or "term".
    Rule(&'static str),
}

impl From<&[TokenKind]> for Expected {
    fn from(kinds: &[TokenKind]) -> Self {
        Expected::Tokens(kinds.to_vec())
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expected::Tokens(kinds) if kinds.len() == 1 => write!(f, "'{}'", kinds[0]),
            Expected::Tokens(kinds) => {
                write!(f, "one of {}", kinds.iter().map(|k| format!("'{k}'")).join(", "))
            }
            Expected::Rule(rule) => write!(f, "{rule}"),
        }
    }
}

/// Error returned when an unexpected token type is encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Mismatch {
        expected: Expected,
        encountered: Token,
    },
    EndOfSource {
        expected: Expected,
        /// Span of the last token in the stream, if any.
        span: Option<Span>,
    },
}

impl TokenError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            TokenError::Mismatch { encountered, .. } => Some(&encountered.span),
            TokenError::EndOfSource { span, .. } => span.as_ref(),
        }
    }
}

impl error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenError as E;
        match self {
            E::Mismatch {
                expected,
                encountered,
            } => write!(
                f,
                "{}: encountered unexpected token '{}', expected {}",
                encountered.span, encountered.lexeme, expected
            ),
            E::EndOfSource { expected, .. } => {
                write!(f, "unexpected end of source code, expected {}", expected)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let stream = TokenStream::from_source("foo.bar(1)").unwrap();

        assert_eq!(stream.peek().map(|t| t.lexeme.as_str()), Some("foo"));
        assert!(stream.is_symbol_at(1, Symbol::Dot));
        assert_eq!(stream.peek_nth(2).map(|t| t.lexeme.as_str()), Some("bar"));
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.peek().map(|t| t.lexeme.as_str()), Some("foo"));
    }

    #[test]
    fn test_consume_mismatch_keeps_cursor() {
        let mut stream = TokenStream::from_source("let x;").unwrap();

        stream.consume_keyword(Keyword::Let).unwrap();
        let err = stream.consume_symbol(Symbol::Semicolon).unwrap_err();
        assert_eq!(stream.position(), 1);
        match err {
            TokenError::Mismatch { encountered, .. } => assert_eq!(encountered.lexeme, "x"),
            _ => panic!("expected mismatch"),
        }

        assert!(stream.consume(TokenKind::Identifier).is_ok());
        assert!(stream.match_token(TokenKind::Symbol(Symbol::Semicolon)).is_some());
        assert!(stream.at_end());
    }

    #[test]
    fn test_end_of_source() {
        let mut stream = TokenStream::from_source("return").unwrap();
        stream.next_token();

        let err = stream.consume_symbol(Symbol::Semicolon).unwrap_err();
        assert!(matches!(err, TokenError::EndOfSource { .. }));
        assert_eq!(err.span().map(|s| s.index), Some(0));
        assert_eq!(err.to_string(), "unexpected end of source code, expected ';'");
    }
}
