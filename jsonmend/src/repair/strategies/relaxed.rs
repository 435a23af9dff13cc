//! Maximally permissive decoding strategy.

use serde_json::{Map, Number, Value};

use super::RepairStrategy;
use crate::error::{MendError, Result};

/// Strategy that decodes relaxed JSON-like syntax.
///
/// Beyond what [`super::TolerantStrategy`] accepts (comments, trailing
/// commas), this decoder also handles:
/// - single-quoted strings for keys and values
/// - unquoted identifier keys
/// - bare words as string values
/// - hex integer literals (`0x1F` decodes to `31`)
/// - `Infinity`, `-Infinity`, and `NaN`, captured as strings since JSON has
///   no such numbers
///
/// It stays strict about structure: separators and nesting must still be
/// coherent, so plain prose does not decode to a value.
#[derive(Debug, Clone, Copy)]
pub struct RelaxedStrategy {
    max_depth: usize,
}

impl RelaxedStrategy {
    /// Creates a new relaxed strategy with the given nesting limit.
    #[inline]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl RepairStrategy for RelaxedStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "relaxed"
    }

    fn attempt(&self, input: &str) -> Result<Value> {
        let mut decoder = RelaxedDecoder::new(input, self.max_depth);
        decoder.decode_document()
    }

    #[inline]
    fn priority(&self) -> u8 {
        4
    }
}

struct RelaxedDecoder {
    chars: Vec<char>,
    pos: usize,
    max_depth: usize,
}

impl RelaxedDecoder {
    fn new(input: &str, max_depth: usize) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            max_depth,
        }
    }

    fn decode_document(&mut self) -> Result<Value> {
        self.skip_trivia();
        let value = self.decode_value(0)?;
        self.skip_trivia();

        if self.pos < self.chars.len() {
            return Err(self.fail("trailing content after value"));
        }
        Ok(value)
    }

    fn fail(&self, message: &str) -> MendError {
        MendError::strategy("relaxed", format!("{message} at position {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.pos += 1;
            }

            if self.peek() != Some('/') {
                return;
            }
            match self.chars.get(self.pos + 1) {
                Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                Some('*') => {
                    self.pos += 2;
                    while self.pos < self.chars.len() {
                        if self.peek() == Some('*') && self.chars.get(self.pos + 1) == Some(&'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn decode_value(&mut self, depth: usize) -> Result<Value> {
        if depth >= self.max_depth {
            return Err(MendError::DepthLimitExceeded {
                depth,
                max_depth: self.max_depth,
            });
        }

        match self.peek() {
            Some('{') => self.decode_object(depth),
            Some('[') => self.decode_array(depth),
            Some(q @ ('"' | '\'')) => self.decode_quoted(q).map(Value::String),
            Some(_) => self.decode_bare_token(),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    fn decode_object(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '{'
        let mut map = Map::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }

            let key = self.decode_key()?;
            self.skip_trivia();
            if self.peek() != Some(':') {
                return Err(self.fail("expected ':' after object key"));
            }
            self.pos += 1;

            self.skip_trivia();
            let value = self.decode_value(depth + 1)?;
            map.insert(key, value);

            self.skip_trivia();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                _ => return Err(self.fail("expected ',' or '}' in object")),
            }
        }
    }

    fn decode_array(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }

            items.push(self.decode_value(depth + 1)?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                _ => return Err(self.fail("expected ',' or ']' in array")),
            }
        }
    }

    /// Decodes an object key: quoted (either style) or a bare identifier.
    fn decode_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.decode_quoted(q),
            Some(c) if is_ident_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_char) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            _ => Err(self.fail("expected object key")),
        }
    }

    /// Decodes a quoted string with lenient escape handling: recognized
    /// escapes are decoded, unknown escapes keep the escaped character.
    fn decode_quoted(&mut self, quote: char) -> Result<String> {
        self.pos += 1; // consume opening quote
        let mut out = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some('b') => out.push('\u{0008}'),
                        Some('f') => out.push('\u{000C}'),
                        Some('u') => {
                            let code = self.decode_unicode_escape()?;
                            out.push(code);
                            continue;
                        }
                        Some(c) => out.push(c),
                        None => return Err(self.fail("unterminated string")),
                    }
                    self.pos += 1;
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
                None => return Err(self.fail("unterminated string")),
            }
        }
    }

    /// Decodes the `XXXX` of a `\uXXXX` escape. `self.pos` is on the `u`.
    fn decode_unicode_escape(&mut self) -> Result<char> {
        if self.pos + 4 >= self.chars.len() {
            return Err(self.fail("truncated unicode escape"));
        }
        let digits: String = self.chars[self.pos + 1..self.pos + 5].iter().collect();
        let code = u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.fail("invalid unicode escape"))?;
        self.pos += 5;
        Ok(code)
    }

    /// Decodes a bare token: a keyword, number, hex literal, non-finite
    /// pseudo-number, or - failing all of those - a plain string.
    fn decode_bare_token(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !matches!(c, ',' | '}' | ']' | ':') && !c.is_whitespace())
        {
            self.pos += 1;
        }

        let token: String = self.chars[start..self.pos].iter().collect();
        if token.is_empty() {
            return Err(self.fail("unexpected character"));
        }

        match token.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" => return Ok(Value::Null),
            "Infinity" | "-Infinity" | "NaN" => return Ok(Value::String(token)),
            _ => {}
        }

        if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            if let Ok(n) = u64::from_str_radix(hex, 16) {
                return Ok(Value::Number(n.into()));
            }
        }

        if let Ok(n) = serde_json::from_str::<Number>(&token) {
            return Ok(Value::Number(n));
        }

        Ok(Value::String(token))
    }
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '-')
}
