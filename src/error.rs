//! Error types for mesh analysis.
//!
//! This module provides a unified error type [`MeshError`] that covers
//! all error conditions that can occur while reading a mesh description,
//! building the network model, and solving for mesh currents.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Unified error type for all mesh analysis operations.
#[derive(Error, Debug)]
pub enum MeshError {
    // ============ Network Errors ============
    /// Malformed or out-of-range element value or mesh reference
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The assembled linear system has no unique solution
    #[error("Singular system - mesh currents are not uniquely determined (check for meshes with no resistors and no current source)")]
    SingularSystem,

    // ============ Description Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A description line was rejected by the network model
    #[error("Line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: Box<MeshError>,
    },

    // ============ I/O Errors ============
    /// Error reading a mesh description file
    #[error("Failed to read mesh description '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl MeshError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Attach a description line number to an error.
    pub fn at_line(self, line: usize) -> Self {
        Self::InvalidLine {
            line,
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is an invalid-input error.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidInput { .. } => true,
            Self::InvalidLine { source, .. } => source.is_invalid_input(),
            _ => false,
        }
    }
}
