use crate::{compile::CompileError, lex::LexError, parsing::ParseError, tokens::Span};
use std::{error, fmt, io};

pub type JackResult<T> = std::result::Result<T, JackError>;

/// Failure of any stage while compiling one unit.
#[derive(Debug)]
pub enum JackError {
    Lex(LexError),
    Parse(ParseError),
    Compile(CompileError),
    Io(io::Error),
}

impl JackError {
    /// Source location the error points at, when known.
    pub fn span(&self) -> Option<&Span> {
        match self {
            JackError::Lex(err) => Some(err.span()),
            JackError::Parse(ParseError::Token(err)) => err.span(),
            JackError::Parse(err) => err.token().map(|token| &token.span),
            JackError::Compile(err) => Some(err.span()),
            JackError::Io(_) => None,
        }
    }
}

impl error::Error for JackError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            JackError::Lex(err) => Some(err),
            JackError::Parse(err) => Some(err),
            JackError::Compile(err) => Some(err),
            JackError::Io(err) => Some(err),
        }
    }
}

impl fmt::Display for JackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JackError::Lex(err) => write!(f, "lexical error: {err}"),
            JackError::Parse(err) => write!(f, "syntax error: {err}"),
            JackError::Compile(err) => write!(f, "compile error: {err}"),
            JackError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl From<LexError> for JackError {
    fn from(err: LexError) -> Self {
        JackError::Lex(err)
    }
}

impl From<ParseError> for JackError {
    fn from(err: ParseError) -> Self {
        JackError::Parse(err)
    }
}

impl From<CompileError> for JackError {
    fn from(err: CompileError) -> Self {
        JackError::Compile(err)
    }
}

impl From<io::Error> for JackError {
    fn from(err: io::Error) -> Self {
        JackError::Io(err)
    }
}
