//! Path expression parser
//!
//! A recursive descent parser for the narrow access-expression grammar:
//!
//! ```text
//! path      := root ( accessor )*
//! root      := identifier | '[' literal ']'
//! accessor  := '.' identifierName | '[' literal ']'
//! literal   := stringLiteral | numberLiteral
//! ```
//!
//! Copyright (c) 2025 Jsonmap Team
//! Licensed under the Apache-2.0 license

use super::error::PathError;
use super::key_path::KeyPath;
use std::iter::Peekable;
use std::str::Chars;

/// Words that cannot start a path; after a dot they are ordinary names.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

pub(crate) fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Whether `key` can be written after a dot
pub(crate) fn is_identifier_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Path expression parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Byte offset of the current character
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self, PathError> {
        if input.trim().is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        })
    }

    /// Parse the whole input into a key-path
    pub fn parse(mut self) -> Result<KeyPath, PathError> {
        let mut path = KeyPath::new();

        self.skip_whitespace();
        path.push(self.parse_root()?);

        loop {
            self.skip_whitespace();
            match self.current_char() {
                None => break,
                Some('.') => {
                    self.advance();
                    self.skip_whitespace();
                    path.push(self.parse_identifier()?);
                }
                Some('[') => path.push(self.parse_bracket()?),
                Some(ch) => return Err(self.error(format!("unexpected character '{}'", ch))),
            }
        }

        Ok(path)
    }

    fn parse_root(&mut self) -> Result<String, PathError> {
        if self.current_char() == Some('[') {
            return self.parse_bracket();
        }

        let start = self.position;
        let name = self.parse_identifier()?;
        if is_reserved_word(&name) {
            return Err(PathError::syntax(
                self.input,
                start,
                format!("reserved word '{}' cannot start a path", name),
            ));
        }
        Ok(name)
    }

    fn parse_identifier(&mut self) -> Result<String, PathError> {
        let mut name = String::new();

        match self.current_char() {
            Some(ch) if is_identifier_start(ch) => {
                name.push(ch);
                self.advance();
            }
            Some(ch) => return Err(self.error(format!("expected an identifier, found '{}'", ch))),
            None => return Err(self.error("expected an identifier, found end of input")),
        }

        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            name.push(ch);
            self.advance();
        }

        Ok(name)
    }

    /// Parse `[ literal ]` and return the literal as a key
    fn parse_bracket(&mut self) -> Result<String, PathError> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let key = match self.current_char() {
            Some(quote @ ('\'' | '"')) => self.parse_string(quote)?,
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.parse_number()?,
            Some(']') => return Err(self.error("empty brackets")),
            Some(ch) if is_identifier_start(ch) => {
                return Err(self.error("computed property; expected a string or number literal"))
            }
            Some(ch) => {
                return Err(self.error(format!(
                    "expected a string or number literal, found '{}'",
                    ch
                )))
            }
            None => return Err(self.error("unterminated brackets")),
        };

        self.skip_whitespace();
        match self.current_char() {
            Some(']') => {
                self.advance();
                Ok(key)
            }
            Some(',') => Err(self.error("brackets must hold exactly one literal")),
            Some(ch) => Err(self.error(format!("expected ']', found '{}'", ch))),
            None => Err(self.error("unterminated brackets")),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, PathError> {
        let start = self.position;
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.current_char() {
                None | Some('\n') | Some('\r') => {
                    return Err(PathError::syntax(self.input, start, "unterminated string literal"));
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(value);
                }
                Some('\\') => {
                    self.advance();
                    if let Some(ch) = self.parse_escape()? {
                        value.push(ch);
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Parse the character(s) after a backslash; `None` for a line continuation
    fn parse_escape(&mut self) -> Result<Option<char>, PathError> {
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Err(self.error("unterminated string literal")),
        };
        self.advance();

        let escaped = match ch {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{0008}',
            'f' => '\u{000c}',
            'v' => '\u{000b}',
            '0' if !self.current_char().is_some_and(|c| c.is_ascii_digit()) => '\0',
            '1'..='9' | '0' => return Err(self.error("octal escapes are not supported")),
            'x' => {
                let code = self.parse_hex_digits(2)?;
                char::from_u32(code).ok_or_else(|| self.error("invalid hex escape"))?
            }
            'u' => return self.parse_unicode_escape().map(Some),
            '\r' => {
                if self.current_char() == Some('\n') {
                    self.advance();
                }
                return Ok(None);
            }
            '\n' | '\u{2028}' | '\u{2029}' => return Ok(None),
            other => other,
        };

        Ok(Some(escaped))
    }

    fn parse_unicode_escape(&mut self) -> Result<char, PathError> {
        let code = self.parse_code_unit()?;

        if (0xD800..0xDC00).contains(&code) {
            // A high surrogate must be followed by an escaped low surrogate.
            if self.current_char() == Some('\\') {
                self.advance();
                if self.current_char() == Some('u') {
                    self.advance();
                    let low = self.parse_code_unit()?;
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(combined)
                            .ok_or_else(|| self.error("invalid unicode escape"));
                    }
                }
            }
            return Err(self.error("unpaired surrogate in unicode escape"));
        }

        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    /// Parse `XXXX` or `{X...}` after `\u`
    fn parse_code_unit(&mut self) -> Result<u32, PathError> {
        if self.current_char() != Some('{') {
            return self.parse_hex_digits(4);
        }

        self.advance();
        let mut code: u32 = 0;
        let mut digits = 0;
        while let Some(ch) = self.current_char() {
            if ch == '}' {
                break;
            }
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| self.error(format!("invalid hex digit '{}'", ch)))?;
            code = code * 16 + digit;
            if code > 0x10FFFF {
                return Err(self.error("unicode escape out of range"));
            }
            digits += 1;
            self.advance();
        }
        if digits == 0 || self.current_char() != Some('}') {
            return Err(self.error("malformed unicode escape"));
        }
        self.advance();
        Ok(code)
    }

    fn parse_hex_digits(&mut self, count: usize) -> Result<u32, PathError> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("expected a hex digit"))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    /// Parse a numeric literal and return its canonical string form
    fn parse_number(&mut self) -> Result<String, PathError> {
        let start = self.position;

        let value = if self.current_char() == Some('0')
            && matches!(self.peek_next(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.advance();
            let radix = match self.current_char() {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            self.advance();
            self.parse_radix_digits(radix)?
        } else {
            self.parse_decimal()?
        };

        if self.current_char().is_some_and(is_identifier_part) {
            return Err(PathError::syntax(
                self.input,
                start,
                "identifier starts immediately after numeric literal",
            ));
        }

        Ok(number_key(value))
    }

    fn parse_radix_digits(&mut self, radix: u32) -> Result<f64, PathError> {
        let mut value = 0f64;
        let mut digits = 0;
        while let Some(digit) = self.current_char().and_then(|c| c.to_digit(radix)) {
            value = value * f64::from(radix) + f64::from(digit);
            digits += 1;
            self.advance();
        }
        if digits == 0 {
            return Err(self.error("missing digits after radix prefix"));
        }
        Ok(value)
    }

    fn parse_decimal(&mut self) -> Result<f64, PathError> {
        let start = self.position;
        let mut text = String::new();

        self.take_digits(&mut text);
        if text.len() > 1 && text.starts_with('0') {
            return Err(PathError::syntax(
                self.input,
                start,
                "legacy octal literals are not supported",
            ));
        }

        if self.current_char() == Some('.') {
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }
        if text == "." {
            return Err(PathError::syntax(self.input, start, "expected a number literal"));
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            text.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                text.push(sign);
                self.advance();
            }
            if !self.take_digits(&mut text) {
                return Err(self.error("missing exponent digits"));
            }
        }

        text.parse::<f64>()
            .map_err(|_| PathError::syntax(self.input, start, "invalid number literal"))
    }

    /// Append consecutive ASCII digits to `text`; true if any were taken
    fn take_digits(&mut self, text: &mut String) -> bool {
        let before = text.len();
        while let Some(ch) = self.current_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text.len() > before
    }

    // Helper methods

    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() || ch == '\u{feff}' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, reason: impl Into<String>) -> PathError {
        PathError::syntax(self.input, self.position, reason)
    }
}

/// String form of a numeric key, matching how numbers print as property names
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent form, `1e+21` and
/// `1.5e-7`; everything else is written out positionally.
pub(crate) fn number_key(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i128);
    }
    format!("{}", value)
}
