//! Structural parser for sectioned configuration text
//!
//! This module provides the parser that pulls tokens from the scanner one at
//! a time and builds a [`Document`] in a single left-to-right pass.

use crate::error::ParseError;
use crate::scanner::{Scanner, Token, TokenKind};
use crate::value::{Document, List, Value};
use log::{debug, trace};

/// Configuration options for the parser
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Accept strings missing their closing quote instead of failing.
    ///
    /// The string then runs to end of input with only the opening quote
    /// removed; no trailing character is dropped.
    pub lenient_strings: bool,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unterminated strings are accepted
    pub fn with_lenient_strings(mut self, lenient: bool) -> Self {
        self.lenient_strings = lenient;
        self
    }
}

/// Section and key context carried between entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserState {
    /// Most recently opened section
    pub current_section: Option<String>,
    /// Most recently declared key within the current section
    pub pending_key: Option<String>,
}

/// Parser that consumes tokens and builds a document
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    config: ParserConfig,
    state: ParserState,
    document: Document,
}

impl<'a> Parser<'a> {
    /// Creates a new parser with default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Creates a parser with custom configuration
    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self {
            scanner: Scanner::new(input),
            config,
            state: ParserState::default(),
            document: Document::new(),
        }
    }

    /// Returns the current section/key context
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Parses the whole input.
    ///
    /// Returns early, without error, on a top-level token that starts no
    /// production (a brace, comma, string or number); everything accumulated
    /// up to that point is kept.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::LeftBracket => self.parse_section_header()?,
                TokenKind::RightBracket => {
                    return Err(ParseError::UnexpectedToken {
                        text: token.text.to_string(),
                    });
                }
                TokenKind::Identifier => self.declare_key(token)?,
                TokenKind::Equal => self.parse_assignment()?,
                TokenKind::Comment | TokenKind::NewLine => {}
                TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::String
                | TokenKind::Comma
                | TokenKind::Number => {
                    debug!(
                        "stopping at top-level {} {:?}, {} section(s) parsed",
                        token.kind,
                        token.text,
                        self.document.len()
                    );
                    break;
                }
            }
        }

        Ok(self.document)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.scanner.next_token();
        if let Some(token) = &token {
            trace!("token {} {:?}", token.kind, token.text);
        }
        token
    }

    /// Fetches the next token, requiring it to be of `expected` kind
    fn expect(&mut self, expected: TokenKind) -> Result<Token<'a>, ParseError> {
        match self.advance() {
            Some(token) if token.kind == expected => Ok(token),
            Some(token) => Err(ParseError::WrongToken {
                expected,
                found: token.kind,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }

    // SECTION = '[' IDENTIFIER ']'
    fn parse_section_header(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::RightBracket)?;

        debug!("opening section {:?}", name.text);
        self.document.reset_section(name.text);
        self.state.current_section = Some(name.text.to_string());
        self.state.pending_key = None;
        Ok(())
    }

    fn declare_key(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        let Some(section) = self.state.current_section.as_deref() else {
            return Err(ParseError::MissingSection {
                key: token.text.to_string(),
            });
        };
        if let Some(entries) = self.document.section_mut(section) {
            entries.insert(token.text.to_string(), Value::Null);
        }
        self.state.pending_key = Some(token.text.to_string());
        Ok(())
    }

    // VALUE = SCALAR | '[' SCALAR (',' SCALAR)* ']'
    fn parse_assignment(&mut self) -> Result<(), ParseError> {
        let key = self.state.pending_key.clone().ok_or(ParseError::MissingKey)?;
        let section = self
            .state
            .current_section
            .clone()
            .ok_or_else(|| ParseError::MissingSection { key: key.clone() })?;

        let value = match self.advance() {
            Some(token) if token.kind == TokenKind::LeftBracket => self.parse_list()?,
            Some(token) => self.convert_scalar(token)?,
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "a value".to_string(),
                });
            }
        };

        trace!("{section}.{key} = {value}");
        if let Some(entries) = self.document.section_mut(&section) {
            entries.insert(key, value);
        }
        Ok(())
    }

    /// Reads list elements after the opening bracket.
    ///
    /// A closing bracket or end of input ends the list; commas are skipped.
    fn parse_list(&mut self) -> Result<Value, ParseError> {
        let mut items = List::new();
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::RightBracket => break,
                TokenKind::Comma => continue,
                _ => items.push(self.convert_scalar(token)?),
            }
        }
        Ok(Value::List(Box::new(items)))
    }

    fn convert_scalar(&self, token: Token<'a>) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::Number => parse_number(token.text).map(Value::Number),
            TokenKind::String => self.unquote(token.text).map(Value::String),
            _ => Err(ParseError::UnexpectedToken {
                text: token.text.to_string(),
            }),
        }
    }

    fn unquote(&self, text: &str) -> Result<String, ParseError> {
        let inner = &text[1..];
        match inner.strip_suffix('"') {
            Some(inner) => Ok(inner.to_string()),
            None if self.config.lenient_strings => Ok(inner.to_string()),
            None => Err(ParseError::UnterminatedString {
                text: text.to_string(),
            }),
        }
    }
}

/// Parses a number token as `f64`.
///
/// Surrounding whitespace (for example the `\r` of a CRLF line ending) is
/// ignored, and `_` is accepted as a separator between two digits.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        text: text.to_string(),
    };
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());

    let cleaned = if trimmed.contains('_') {
        let bytes = trimmed.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'_' {
                let prev = i.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(i + 1).copied();
                if !prev.is_some_and(|c| c.is_ascii_digit())
                    || !next.is_some_and(|c| c.is_ascii_digit())
                {
                    return Err(invalid());
                }
            }
        }
        trimmed.replace('_', "")
    } else {
        trimmed.to_string()
    };

    cleaned.parse::<f64>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document, ParseError> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parser_creation() {
        let parser = Parser::new("[a]");
        assert_eq!(parser.state(), &ParserState::default());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_and_comments_only() {
        let doc = parse("\n   \n# just a comment\n\n  # another\n").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_scalar_number() {
        let doc = parse("[a]\npi = 3.14\n").unwrap();
        assert_eq!(doc.get("a", "pi"), Some(&Value::Number(3.14)));
    }

    #[test]
    fn test_scalar_string_strips_quotes_only() {
        let doc = parse("[a]\ns = \"abc\"\nesc = \"x\\ny\"\n").unwrap();
        assert_eq!(doc.get("a", "s"), Some(&Value::from("abc")));
        // No unescaping of inner characters
        assert_eq!(doc.get("a", "esc"), Some(&Value::from("x\\ny")));
    }

    #[test]
    fn test_empty_string() {
        let doc = parse("[a]\ns = \"\"\n").unwrap();
        assert_eq!(doc.get("a", "s"), Some(&Value::from("")));
    }

    #[test]
    fn test_list_value() {
        let doc = parse("[a]\nkey = [1, 2, \"three\"]\n").unwrap();
        let expected = Value::from(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::from("three"),
        ]);
        assert_eq!(doc.get("a", "key"), Some(&expected));
        assert_eq!(doc.section("a").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_list() {
        let doc = parse("[a]\nkey = []\n").unwrap();
        assert_eq!(doc.get("a", "key"), Some(&Value::from(Vec::new())));
    }

    #[test]
    fn test_list_terminated_by_end_of_input() {
        let doc = parse("[a]\nkey = [1, 2").unwrap();
        assert_eq!(
            doc.get("a", "key"),
            Some(&Value::from(vec![Value::Number(1.0), Value::Number(2.0)]))
        );
    }

    #[test]
    fn test_list_with_identifier_element_fails() {
        let err = parse("[a]\nkey = [1, two]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: "two".to_string()
            }
        );
    }

    #[test]
    fn test_section_redeclaration_resets_contents() {
        let doc = parse("[a]\nx=1\n[a]\ny=2\n").unwrap();
        let section = doc.section("a").unwrap();
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("y"), Some(&Value::Number(2.0)));
        assert!(section.get("x").is_none());
    }

    #[test]
    fn test_bare_identifier_declares_null() {
        let doc = parse("[a]\nflag\n").unwrap();
        assert_eq!(doc.get("a", "flag"), Some(&Value::Null));
    }

    #[test]
    fn test_reassignment_overrides() {
        let doc = parse("[a]\nx = 1\nx = \"two\"\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::from("two")));
    }

    #[test]
    fn test_assignment_on_following_line_uses_pending_key() {
        let doc = parse("[a]\nx\n= 5\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_comment_between_key_and_assignment() {
        let doc = parse("[a]\nx\n# c\n= 5\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::Number(5.0)));
        assert_eq!(doc.section("a").unwrap().len(), 1);

        let doc = parse("[a]\nx # trailing\n= \"v\"\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::from("v")));
    }

    #[test]
    fn test_empty_section() {
        let doc = parse("[empty]\n[b]\nk = 1\n").unwrap();
        assert!(doc.section("empty").unwrap().is_empty());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_missing_closing_bracket() {
        let err = parse("[server\nhost = \"x\"\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongToken {
                expected: TokenKind::RightBracket,
                found: TokenKind::NewLine,
            }
        );
    }

    #[test]
    fn test_section_name_must_be_identifier() {
        let err = parse("[\"quoted\"]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongToken {
                expected: TokenKind::Identifier,
                found: TokenKind::String,
            }
        );
    }

    #[test]
    fn test_section_header_at_end_of_input() {
        assert!(matches!(
            parse("[").unwrap_err(),
            ParseError::UnexpectedEof { .. }
        ));
        assert!(matches!(
            parse("[a").unwrap_err(),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_stray_right_bracket() {
        let err = parse("[a]\n]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: "]".to_string()
            }
        );
    }

    #[test]
    fn test_key_before_section() {
        let err = parse("orphan = 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingSection {
                key: "orphan".to_string()
            }
        );
    }

    #[test]
    fn test_assignment_without_key() {
        assert_eq!(parse("[a]\n= 1\n").unwrap_err(), ParseError::MissingKey);
    }

    #[test]
    fn test_pending_key_does_not_cross_sections() {
        assert_eq!(
            parse("[a]\nx = 1\n[b]\n= 2\n").unwrap_err(),
            ParseError::MissingKey
        );
    }

    #[test]
    fn test_assignment_at_end_of_input() {
        assert!(matches!(
            parse("[a]\nx =").unwrap_err(),
            ParseError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_identifier_value_is_unexpected() {
        let err = parse("[a]\nx = true\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: "true".to_string()
            }
        );
    }

    #[test]
    fn test_newline_value_is_unexpected() {
        let err = parse("[a]\nx =\ny = 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: "\n".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = parse("[a]\nv = 1.2.3\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                text: "1.2.3".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = parse("[a]\ns = \"abc\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedString {
                text: "\"abc\n".to_string()
            }
        );
    }

    #[test]
    fn test_lone_quote_is_unterminated() {
        assert!(matches!(
            parse("[a]\ns = \"").unwrap_err(),
            ParseError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn test_lenient_strings_absorb_to_end() {
        let config = ParserConfig::new().with_lenient_strings(true);
        let doc = Parser::with_config("[a]\ns = \"abc\nx = 1", config)
            .parse()
            .unwrap();
        assert_eq!(doc.get("a", "s"), Some(&Value::from("abc\nx = 1")));
        assert!(doc.get("a", "x").is_none());
    }

    #[test]
    fn test_lenient_strings_keep_last_character() {
        let config = ParserConfig::new().with_lenient_strings(true);
        let doc = Parser::with_config("[a]\ns = \"abc", config.clone())
            .parse()
            .unwrap();
        assert_eq!(doc.get("a", "s"), Some(&Value::from("abc")));

        // Terminated strings are unaffected by the setting
        let doc = Parser::with_config("[a]\ns = \"abc\"\n", config)
            .parse()
            .unwrap();
        assert_eq!(doc.get("a", "s"), Some(&Value::from("abc")));
    }

    #[test]
    fn test_top_level_number_stops_silently() {
        let doc = parse("[a]\nx = 1\n42\n[b]\ny = 2\n").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("a", "x"), Some(&Value::Number(1.0)));
        assert!(!doc.contains_section("b"));
    }

    #[test]
    fn test_top_level_brace_stops_silently() {
        let doc = parse("[a]\nx = 1\n{\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_crlf_line_endings() {
        // '\r' is an ordinary identifier character; the number conversion trims it
        let doc = parse("[a]\r\nx = 1\r\n").unwrap();
        assert_eq!(doc.get("a", "x"), Some(&Value::Number(1.0)));
        assert_eq!(doc.get("a", "\r"), Some(&Value::Null));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42").unwrap(), 42.0);
        assert_eq!(parse_number("3.14").unwrap(), 3.14);
        assert_eq!(parse_number("1e3").unwrap(), 1000.0);
        assert_eq!(parse_number("1\r").unwrap(), 1.0);
        assert_eq!(parse_number("1_000").unwrap(), 1000.0);
        assert!(parse_number("1__0").is_err());
        assert!(parse_number("1_").is_err());
        assert!(parse_number("1.2.3").is_err());
        assert!(parse_number("10kb").is_err());
    }

    #[test]
    fn test_deterministic() {
        let input = "[s]\na = 1\nb = [\"x\", 2]\n# c\n[t]\nc = \"d\"\n";
        assert_eq!(parse(input).unwrap(), parse(input).unwrap());
    }
}
