//! Literal-structure evaluation strategy.

use serde_json::{Map, Number, Value};

use super::RepairStrategy;
use crate::error::{MendError, Result};

/// Last-resort strategy that evaluates the text as a literal nested
/// container expression.
///
/// Preprocessing force-wraps non-bracketed text in `{`...`}` and
/// blanket-replaces every single quote with a double quote, then a
/// restricted parser evaluates the result. Only data literals are accepted:
/// numbers, strings, booleans (including `True`/`False`), `null`/`None`,
/// arrays, and string-keyed mappings. Nothing is ever executed.
#[derive(Debug, Clone, Copy)]
pub struct LiteralStrategy {
    max_depth: usize,
}

impl LiteralStrategy {
    /// Creates a new literal strategy with the given nesting limit.
    #[inline]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl RepairStrategy for LiteralStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "literal"
    }

    fn attempt(&self, input: &str) -> Result<Value> {
        let trimmed = input.trim();
        let wrapped = if trimmed.starts_with('{') || trimmed.starts_with('[') {
            trimmed.to_string()
        } else {
            format!("{{{trimmed}}}")
        };
        let rewritten = wrapped.replace('\'', "\"");

        let mut parser = LiteralParser::new(&rewritten, self.max_depth);
        parser.parse_document()
    }

    #[inline]
    fn priority(&self) -> u8 {
        5
    }
}

/// Restricted literal parser: container and scalar literals only.
struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    max_depth: usize,
}

impl LiteralParser {
    fn new(input: &str, max_depth: usize) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            max_depth,
        }
    }

    fn parse_document(&mut self) -> Result<Value> {
        self.skip_ws();
        let value = self.parse_value(0)?;
        self.skip_ws();

        if self.pos < self.chars.len() {
            return Err(self.fail("trailing content after literal"));
        }
        Ok(value)
    }

    fn fail(&self, message: &str) -> MendError {
        MendError::strategy("literal", format!("{message} at position {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
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
            Some('{') => self.parse_map(depth),
            Some('[') => self.parse_list(depth),
            Some('"') => self.parse_string().map(Value::String),
            Some(_) => self.parse_scalar(),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    fn parse_map(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '{'
        let mut map = Map::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some('"') => {}
                _ => return Err(self.fail("mapping keys must be string literals")),
            }

            let key = self.parse_string()?;
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.fail("expected ':' after mapping key"));
            }
            self.pos += 1;

            self.skip_ws();
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1, // trailing comma allowed
                Some('}') => {}
                _ => return Err(self.fail("expected ',' or '}' in mapping")),
            }
        }
    }

    fn parse_list(&mut self, depth: usize) -> Result<Value> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }

            items.push(self.parse_value(depth + 1)?);

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                _ => return Err(self.fail("expected ',' or ']' in list")),
            }
        }
    }

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
                None => return Err(self.fail("unterminated string literal")),
            }
        }

        let raw: String = self.chars[start..self.pos.min(self.chars.len())]
            .iter()
            .collect();
        serde_json::from_str(&raw).map_err(|e| MendError::InvalidJson(e.to_string()))
    }

    /// Parses keyword and number literals, including the Pythonic spellings
    /// an LLM may emit (`True`, `False`, `None`).
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
            "true" | "True" => return Ok(Value::Bool(true)),
            "false" | "False" => return Ok(Value::Bool(false)),
            "null" | "None" => return Ok(Value::Null),
            "" => return Err(self.fail("unexpected character")),
            _ => {}
        }

        if let Ok(n) = serde_json::from_str::<Number>(&token) {
            return Ok(Value::Number(n));
        }

        // Pythonic float spellings such as `1.` or `.5`.
        token
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.fail("not a literal"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn eval(input: &str) -> Result<Value> {
        LiteralStrategy::new(64).attempt(input)
    }

    #[test]
    fn test_single_quoted_mapping() {
        let value = eval("{'a': 1, 'b': 'two'}").unwrap();
        assert_eq!(value, json!({"a": 1, "b": "two"}));
    }

    #[test]
    fn test_bare_fragment_is_wrapped() {
        let value = eval("'k': [1, 2]").unwrap();
        assert_eq!(value, json!({"k": [1, 2]}));
    }

    #[test]
    fn test_python_keywords() {
        let value = eval("{'ok': True, 'bad': False, 'missing': None}").unwrap();
        assert_eq!(value, json!({"ok": true, "bad": false, "missing": null}));
    }

    #[test]
    fn test_trailing_commas_allowed() {
        let value = eval("[1, 2, 3,]").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_python_float_spellings() {
        let value = eval("[1., .5]").unwrap();
        assert_eq!(value, json!([1.0, 0.5]));
    }

    #[test]
    fn test_rejects_non_literal_content() {
        assert!(eval("{'f': lambda x}").is_err());
        assert!(eval("__import__('os')").is_err());
    }

    #[test]
    fn test_rejects_non_string_keys() {
        assert!(eval("{1: 'a'}").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "[".repeat(8), "]".repeat(8));
        assert!(matches!(
            LiteralStrategy::new(4).attempt(&deep),
            Err(MendError::DepthLimitExceeded { .. })
        ));
    }
}
