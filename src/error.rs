//! Error types for sectioned configuration parsing
//!
//! Every malformation stops the parse at the first offending token. The
//! library never terminates the process; callers decide how to report.

use crate::scanner::TokenKind;
use std::fmt;
use thiserror::Error;

/// Main error type for sectconf operations
#[derive(Debug, Error)]
pub enum ConfError {
    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Serde deserialization error
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A production required one token kind and another was fetched
    #[error("Expected {expected}, got {found}")]
    WrongToken { expected: TokenKind, found: TokenKind },

    /// A token with no valid production in the current context
    #[error("Unexpected token {text:?}")]
    UnexpectedToken { text: String },

    /// Input ended in the middle of a production
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Number token whose text is not a floating-point literal
    #[error("Invalid number {text:?}")]
    InvalidNumber { text: String },

    /// String token missing its closing quote
    #[error("Unterminated string {text:?}")]
    UnterminatedString { text: String },

    /// Key declared before any section header
    #[error("Key {key:?} declared outside of any section")]
    MissingSection { key: String },

    /// Assignment with no key declared in the current section
    #[error("Assignment without a preceding key")]
    MissingKey,
}

impl ParseError {
    /// Short, stable name of the error variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParseError::WrongToken { .. } => "WrongToken",
            ParseError::UnexpectedToken { .. } => "UnexpectedToken",
            ParseError::UnexpectedEof { .. } => "UnexpectedEof",
            ParseError::InvalidNumber { .. } => "InvalidNumber",
            ParseError::UnterminatedString { .. } => "UnterminatedString",
            ParseError::MissingSection { .. } => "MissingSection",
            ParseError::MissingKey => "MissingKey",
        }
    }
}

/// Serde integration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerdeError {
    /// Custom serde error message
    #[error("{0}")]
    Custom(String),

    /// Type mismatch during deserialization
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl serde::de::Error for ConfError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ConfError::Serde(SerdeError::Custom(msg.to_string()))
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}
