//! Semantic analysis and stack machine code generation.
mod codegen;
mod ir;
mod symbol;

pub use codegen::CodeGen;
pub use ir::{render, ArithOp, Label, LabelKind, Segment, VmCommand};
pub use symbol::{Symbol, SymbolError, SymbolKind, SymbolTable};

use crate::tokens::{Span, MAX_INT_CONSTANT};
use smol_str::SmolStr;
use std::{error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Variable reference absent from both scopes.
    UndefinedSymbol { name: SmolStr, span: Span },
    /// Name declared twice in the same scope.
    SymbolExists { name: SmolStr, span: Span },
    /// String literal character outside of the constant range.
    CharacterRange { character: char, span: Span },
    /// String literal too long to allocate.
    StringLength { len: usize, span: Span },
    /// A counter of the instruction set ran out of its 16 bit range.
    LimitExceeded { limit: Limit, span: Span },
}

/// Numeric resource with a 16 bit ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Variable slots of one storage kind.
    Slots(SymbolKind),
    /// Suffixes for branch labels.
    Labels,
    /// Arguments of a single call, receiver included.
    Arguments,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Limit::Slots(kind) => write!(f, "{} variables", kind),
            Limit::Labels => write!(f, "branch labels"),
            Limit::Arguments => write!(f, "call arguments"),
        }
    }
}

impl CompileError {
    pub fn span(&self) -> &Span {
        match self {
            CompileError::UndefinedSymbol { span, .. }
            | CompileError::SymbolExists { span, .. }
            | CompileError::CharacterRange { span, .. }
            | CompileError::StringLength { span, .. }
            | CompileError::LimitExceeded { span, .. } => span,
        }
    }
}

impl error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::UndefinedSymbol { name, span } => {
                write!(f, "{span}: undefined symbol '{name}'")
            }
            CompileError::SymbolExists { name, span } => {
                write!(f, "{span}: symbol '{name}' is already defined in this scope")
            }
            CompileError::CharacterRange { character, span } => write!(
                f,
                "{span}: character {character:?} in string literal exceeds code {}",
                MAX_INT_CONSTANT
            ),
            CompileError::StringLength { len, span } => write!(
                f,
                "{span}: string literal of length {len} exceeds maximum of {}",
                MAX_INT_CONSTANT
            ),
            CompileError::LimitExceeded { limit, span } => {
                write!(f, "{span}: too many {limit}, maximum is {}", u16::MAX)
            }
        }
    }
}
