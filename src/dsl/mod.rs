//! Mesh description language.
//!
//! A line-oriented text format for describing a planar network mesh by mesh.
//! It plays the role of the interactive prompts of a classic mesh-analysis
//! worksheet: one line per group of elements, values signed relative to the
//! clockwise reference.
//!
//! # Grammar Overview
//!
//! ```text
//! description = { line }
//! line        = comment | directive | element | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".meshes" integer
//! element     = list_kind mesh value { [','] value }
//!             | "I" mesh value
//!             | "CR" mesh mesh value
//! list_kind   = "R" | "V"
//! mesh        = integer
//! value       = number [unit_suffix]
//!
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Elements
//!
//! | Kind | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistors in a mesh | `R <mesh> <ohms>[, <ohms>...]` |
//! | V | Voltage sources (+ aids CW) | `V <mesh> <volts>[, <volts>...]` |
//! | I | Current source in a mesh | `I <mesh> <amps>` |
//! | CR | Resistor common to two meshes | `CR <mesh> <mesh> <ohms>` |
//!
//! # Example
//!
//! ```text
//! # Two meshes sharing a 5 Ohm resistor
//! .meshes 2
//!
//! R  1  10
//! V  1  10
//! R  2  5
//! CR 1 2 5
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a mesh description string into an AST.
pub fn parse(input: &str) -> Result<MeshAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a mesh description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<MeshAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::MeshError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
