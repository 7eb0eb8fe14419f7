//! Compiler for the Jack language, targeting the textual
//! instruction set of a stack based virtual machine.
//!
//! ```
//! let unit = jack_compiler::compile_str(
//!     "class Main { function void main() { return; } }",
//! ).unwrap();
//! assert_eq!(unit.vm, "function Main.main 0\npush constant 0\nreturn\n");
//! ```
pub mod compile;
pub mod error;
pub mod lex;
pub mod parsing;
pub mod token_stream;
pub mod tokens;
pub mod trace;

pub use error::{JackError, JackResult};

use compile::{CodeGen, VmCommand};
use parsing::{Class, Parse};
use smol_str::SmolStr;
use token_stream::TokenStream;

/// Artifacts produced from one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub class_name: SmolStr,
    /// Flat token listing.
    pub tokens: String,
    /// Parse trace of the class.
    pub trace: String,
    /// Instruction stream, one instruction per line.
    pub vm: String,
}

/// Lex and parse one compilation unit.
pub fn parse_str(source: &str) -> JackResult<Class> {
    let mut stream = TokenStream::from_source(source)?;
    Ok(Class::parse(&mut stream)?)
}

/// Compile one unit to instructions only.
pub fn compile_vm(source: &str) -> JackResult<Vec<VmCommand>> {
    let class = parse_str(source)?;
    Ok(CodeGen::new().compile(&class)?)
}

/// Compile one unit, producing every artifact.
pub fn compile_str(source: &str) -> JackResult<CompiledUnit> {
    // Lexical analysis
    let mut stream = TokenStream::from_source(source)?;

    // Syntactic analysis
    let class = Class::parse(&mut stream)?;

    // Code generation
    let code = CodeGen::new().compile(&class)?;

    Ok(CompiledUnit {
        class_name: class.name.name.clone(),
        tokens: trace::token_listing(stream.tokens()),
        trace: trace::write_trace(&class),
        vm: compile::render(&code),
    })
}
