//! # sectconf
//!
//! A small lexer and parser for sectioned key/value configuration files, with
//! serde integration.
//!
//! ## Overview
//!
//! The format is line oriented and looks like a stripped-down INI/TOML:
//!
//! ```text
//! [server]
//! host = "localhost"
//! ports = [80, 443]
//! # comment line
//! name=42
//! ```
//!
//! Parsing happens in two components:
//!
//! 1. **Scanner**: a lazy, pull-based tokenizer. It segments the input into
//!    brackets, braces, identifiers, numbers, quoted strings, comments,
//!    newlines, commas and `=`; spaces separate tokens and are dropped.
//!
//! 2. **Parser**: a single left-to-right pass over the token stream that
//!    tracks the current section and the most recently declared key, and
//!    builds a [`Document`].
//!
//! Values are floating-point numbers, strings (quotes stripped, no escape
//! processing), or flat lists of those.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sectconf::{parse, Value};
//!
//! let doc = parse("[server]\nhost = \"localhost\"\nports = [80, 443]\n")?;
//!
//! assert_eq!(doc.get("server", "host"), Some(&Value::from("localhost")));
//! assert_eq!(
//!     doc.get("server", "ports").and_then(Value::as_list).map(<[Value]>::len),
//!     Some(2)
//! );
//! # Ok::<(), sectconf::ParseError>(())
//! ```
//!
//! ## Serde Integration
//!
//! ```rust
//! use serde::Deserialize;
//! use sectconf::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct Server {
//!     host: String,
//!     ports: Vec<u16>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Config {
//!     server: Server,
//! }
//!
//! let config: Config = from_str("[server]\nhost = \"localhost\"\nports = [80, 443]\n")?;
//! assert_eq!(config.server.ports, vec![80, 443]);
//! # Ok::<(), sectconf::ConfError>(())
//! ```
//!
//! ## Error Handling
//!
//! The first malformed token stops the parse and is reported as a
//! [`ParseError`] naming the expected and actual token kinds, or the
//! offending token text:
//!
//! ```rust
//! use sectconf::{parse, ParseError, TokenKind};
//!
//! match parse("[server\nhost = \"x\"\n") {
//!     Err(ParseError::WrongToken { expected, found }) => {
//!         assert_eq!(expected, TokenKind::RightBracket);
//!         assert_eq!(found, TokenKind::NewLine);
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```
//!
//! A top-level token that starts no entry (a brace, comma, string or number)
//! ends the parse quietly and returns what was read so far.

pub mod deserializer;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod value;


use std::path::Path;

// Re-export main types and functions
pub use deserializer::{
    DocumentDeserializer, ValueDeserializer, from_document, from_str, from_str_with_config,
};
pub use error::{ConfError, ParseError, SerdeError};
pub use parser::{Parser, ParserConfig, ParserState};
pub use scanner::{Scanner, Token, TokenKind};
pub use value::{Document, List, Section, Value};

/// Parses configuration text with the default configuration
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new(input).parse()
}

/// Parses configuration text with a custom configuration
pub fn parse_with_config(input: &str, config: ParserConfig) -> Result<Document, ParseError> {
    Parser::with_config(input, config).parse()
}

/// Reads a whole file and parses it
pub fn parse_file<P: AsRef<Path>>(path: P, config: ParserConfig) -> Result<Document, ConfError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    log::debug!(
        "read {} bytes from {}",
        content.len(),
        path.as_ref().display()
    );
    Ok(parse_with_config(&content, config)?)
}
