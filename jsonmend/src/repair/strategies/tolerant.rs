//! Comment- and trailing-comma-tolerant parsing strategy.

use serde_json::{Map, Value};

use super::RepairStrategy;
use crate::error::{MendError, Result};

/// Strategy that parses JSON with native tolerance for `//` and `/* */`
/// comments and trailing commas.
///
/// Unlike [`super::NormalizeStrategy`] this performs no textual rewriting:
/// comments and trailing commas are consumed by the parser itself, so string
/// values containing `//` are never damaged.
#[derive(Debug, Clone, Copy)]
pub struct TolerantStrategy {
    max_depth: usize,
}

impl TolerantStrategy {
    /// Creates a new tolerant strategy with the given nesting limit.
    #[inline]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl RepairStrategy for TolerantStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "tolerant"
    }

    fn attempt(&self, input: &str) -> Result<Value> {
        let mut parser = TolerantParser::new(input, self.max_depth);
        parser.parse_document()
    }

    #[inline]
    fn priority(&self) -> u8 {
        3
    }
}

/// Recursive-descent parser over a char buffer.
///
/// Grammar is standard JSON plus: line/block comments wherever whitespace is
/// allowed, and an optional trailing comma before `}` or `]`.
struct TolerantParser {
    chars: Vec<char>,
    pos: usize,
    max_depth: usize,
}

impl TolerantParser {
    fn new(input: &str, max_depth: usize) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            max_depth,
        }
    }

    fn parse_document(&mut self) -> Result<Value> {
        self.skip_trivia()?;
        let value = self.parse_value(0)?;
        self.skip_trivia()?;

        if self.pos < self.chars.len() {
            return Err(self.fail("trailing content after value"));
        }
        Ok(value)
    }

    fn fail(&self, message: &str) -> MendError {
        MendError::strategy("tolerant", format!("{message} at position {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.pos += 1;
            }

            if self.peek() != Some('/') {
                return Ok(());
            }
            match self.chars.get(self.pos + 1) {
                Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                Some('*') => {
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            Some('*') if self.chars.get(self.pos + 1) == Some(&'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                            None => return Err(self.fail("unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth >= self.max_depth {
            return Err(MendError::DepthLimitExceeded {
                depth,
                max_depth: self.max_depth,
            });
        }

        match self.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('"') => self.parse_string().map(Value::String),
            Some(_) => self.parse_scalar(),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '{'
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some('"') => {}
                _ => return Err(self.fail("expected '\"' or '}' in object")),
            }

            let key = self.parse_string()?;
            self.skip_trivia()?;
            if self.peek() != Some(':') {
                return Err(self.fail("expected ':' after object key"));
            }
            self.pos += 1;

            self.skip_trivia()?;
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1, // trailing comma handled by loop head
                Some('}') => {}
                _ => return Err(self.fail("expected ',' or '}' in object")),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }

            items.push(self.parse_value(depth + 1)?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                _ => return Err(self.fail("expected ',' or ']' in array")),
            }
        }
    }

    /// Parses a double-quoted string by collecting the raw literal and
    /// delegating escape handling to `serde_json`.
    fn parse_string(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1; // consume opening quote

        loop {
            match self.peek() {
                Some('\\') => self.pos += 2,
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
                None => return Err(self.fail("unterminated string")),
            }
        }

        let raw: String = self.chars[start..self.pos.min(self.chars.len())]
            .iter()
            .collect();
        serde_json::from_str(&raw).map_err(|e| MendError::InvalidJson(e.to_string()))
    }

    /// Parses `true`, `false`, `null`, or a standard JSON number.
    fn parse_scalar(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
        {
            self.pos += 1;
        }

        let token: String = self.chars[start..self.pos].iter().collect();
        match token.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            "" => Err(self.fail("unexpected character")),
            _ => serde_json::from_str::<serde_json::Number>(&token)
                .map(Value::Number)
                .map_err(|_| self.fail("invalid scalar token")),
        }
    }
}
