//! Lexical scanner for sectioned configuration text
//!
//! The scanner walks the input once, left to right, and hands out one token
//! per call. It performs pure segmentation: identifiers and numbers are
//! greedy runs up to a fixed stop set, and interpreting their contents is
//! left to the parser.

use std::fmt;
use std::iter::FusedIterator;

/// Characters that end an identifier or number run
const STOP_SET: &[u8] = b",\n#\"= ]";

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Identifier,
    NewLine, // \n
    Equal,   // =
    String,  // "..."
    Comment, // #...
    Comma,   // ,
    Number,
}

impl TokenKind {
    /// Returns the name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenKind::LeftBracket => "LeftBracket",
            TokenKind::RightBracket => "RightBracket",
            TokenKind::LeftBrace => "LeftBrace",
            TokenKind::RightBrace => "RightBrace",
            TokenKind::Identifier => "Identifier",
            TokenKind::NewLine => "NewLine",
            TokenKind::Equal => "Equal",
            TokenKind::String => "String",
            TokenKind::Comment => "Comment",
            TokenKind::Comma => "Comma",
            TokenKind::Number => "Number",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single token borrowed from the scanned input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exact source text, quotes and `#` included
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }
}

/// Pull-based scanner over a complete input buffer
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    cursor: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    /// Returns the byte offset of the next unread character
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true once every character has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.input.len()
    }

    /// Produces the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();

        // Spaces separate tokens but are never emitted
        while self.cursor < bytes.len() && bytes[self.cursor] == b' ' {
            self.cursor += 1;
        }
        if self.is_exhausted() {
            return None;
        }

        let start = self.cursor;
        let kind = match bytes[start] {
            b'[' => self.single(TokenKind::LeftBracket),
            b']' => self.single(TokenKind::RightBracket),
            b'{' => self.single(TokenKind::LeftBrace),
            b'}' => self.single(TokenKind::RightBrace),
            b'\n' => self.single(TokenKind::NewLine),
            b'=' => self.single(TokenKind::Equal),
            b',' => self.single(TokenKind::Comma),
            b'"' => {
                // Through the closing quote, or to end of input if there is none
                self.cursor = match self.input[start + 1..].find('"') {
                    Some(idx) => start + 1 + idx + 1,
                    None => self.input.len(),
                };
                TokenKind::String
            }
            b'#' => {
                self.cursor = match self.input[start..].find('\n') {
                    Some(idx) => start + idx,
                    None => self.input.len(),
                };
                TokenKind::Comment
            }
            first => {
                let kind = if first.is_ascii_digit() {
                    TokenKind::Number
                } else {
                    TokenKind::Identifier
                };
                // The first character may be multi-byte; stop bytes are all ASCII
                let first_len = self.input[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.cursor = start + first_len;
                while self.cursor < bytes.len() && !STOP_SET.contains(&bytes[self.cursor]) {
                    self.cursor += 1;
                }
                kind
            }
        };

        Some(Token::new(kind, &self.input[start..self.cursor]))
    }

    #[inline]
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor += 1;
        kind
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl FusedIterator for Scanner<'_> {}
