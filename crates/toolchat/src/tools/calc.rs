//! Restricted arithmetic evaluator for the `calculate` tool.
//!
//! The grammar covers `+ - * / ( )`, decimal literals and unary minus and
//! nothing else. Any other token is rejected before evaluation, so model
//! supplied expressions can never reach names or call syntax.

use crate::errors::{ChatError, ChatResult};

/// Evaluate an arithmetic expression, returning a floating-point result.
pub fn evaluate(expression: &str) -> ChatResult<f64> {
    let mut parser = Parser::new(expression);
    let value = parser.expr()?;
    parser.skip_whitespace();
    if parser.pos < parser.input.len() {
        return Err(parser.unexpected());
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> ChatResult<f64> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> ChatResult<f64> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(ChatError::InvalidArguments(
                            "Invalid expression: division by zero".to_string(),
                        ));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    // factor := '-' factor | '(' expr ')' | number
    fn factor(&mut self) -> ChatResult<f64> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                self.skip_whitespace();
                if self.peek() != Some(b')') {
                    return Err(ChatError::InvalidArguments(
                        "Invalid expression: missing closing parenthesis".to_string(),
                    ));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            _ => Err(self.unexpected()),
        }
    }

    fn number(&mut self) -> ChatResult<f64> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .expect("digits and dots are valid utf-8");
        text.parse::<f64>().map_err(|_| {
            ChatError::InvalidArguments(format!("Invalid expression: bad number literal '{text}'"))
        })
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> ChatError {
        match self.input.get(self.pos) {
            Some(&c) => ChatError::InvalidArguments(format!(
                "Invalid expression: unexpected character '{}' at offset {}",
                c as char, self.pos
            )),
            None => {
                ChatError::InvalidArguments("Invalid expression: unexpected end of input".to_string())
            }
        }
    }
}
