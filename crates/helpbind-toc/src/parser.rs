//! Lenient definition parser.
//!
//! Parses a token stream into a [`Value`] using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! call    → "(" value ")" ";"?
//! bare    → value ";"?
//! value   → object | array | STRING | NUMBER | IDENT
//! object  → "{" (member ("," member)* ","?)? "}"
//! member  → (IDENT | STRING | NUMBER) ":" value
//! array   → "[" (value ("," value)* ","?)? "]"
//! ```
//!
//! Tolerances beyond JSON: unquoted and numeric keys, single-quoted strings, trailing commas,
//! `undefined` (read as null), and elided array elements (`[1,,2]`, read as null).

use crate::{
    error::ParseError,
    lexer::{Spanned, Token, tokenize},
    value::Value,
};

/// Recursive descent parser for definition values.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    index: usize,
    /// Offset added to every reported position.
    base: usize,
    /// Byte length of the parsed input, reported for errors at end of input.
    end: usize,
}

impl Parser {
    /// Tokenizes `input` and creates a parser whose positions are offset by `base`.
    fn new(input: &str, base: usize) -> Result<Self, ParseError> {
        let tokens = tokenize(input).map_err(|mut err| {
            err.position += base;
            ParseError::from(err)
        })?;
        Ok(Self {
            tokens,
            index: 0,
            base,
            end: base + input.len(),
        })
    }

    /// Parses: call → "(" value ")" ";"?
    fn parse_call(mut self) -> Result<Value, ParseError> {
        self.expect(&Token::LParen, "expected '('")?;
        let value = self.parse_value()?;
        self.expect(&Token::RParen, "expected ')' after definition")?;
        self.finish()?;
        Ok(value)
    }

    /// Parses: bare → value ";"?
    fn parse_bare(mut self) -> Result<Value, ParseError> {
        let value = self.parse_value()?;
        self.finish()?;
        Ok(value)
    }

    /// Accepts an optional semicolon and requires end of input.
    fn finish(&mut self) -> Result<(), ParseError> {
        if self.check(&Token::Semicolon) {
            self.advance();
        }
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("unexpected trailing token {token:?}"))),
        }
    }

    /// Parses: value → object | array | STRING | NUMBER | IDENT
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek().cloned() {
            Some(Token::LBrace) => self.parse_object(),
            Some(Token::LBracket) => self.parse_array(),
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Value::String(s))
            }
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Value::Number(n))
            }
            Some(Token::Ident(word)) => {
                let value = match word.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" | "undefined" => Value::Null,
                    _ => return Err(self.error(format!("unknown identifier '{word}'"))),
                };
                self.advance();
                Ok(value)
            }
            Some(token) => Err(self.error(format!("expected a value, found {token:?}"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parses: object → "{" (member ("," member)* ","?)? "}"
    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.advance(); // consume {
        let mut entries = Vec::new();

        loop {
            if self.check(&Token::RBrace) {
                self.advance();
                return Ok(Value::Object(entries));
            }

            let key = match self.peek().cloned() {
                Some(Token::Ident(k) | Token::Str(k) | Token::Number(k)) => {
                    self.advance();
                    k
                }
                Some(token) => return Err(self.error(format!("expected a key, found {token:?}"))),
                None => return Err(self.error("unclosed object")),
            };

            self.expect(&Token::Colon, "expected ':' after key")?;
            let value = self.parse_value()?;
            entries.push((key, value));

            match self.peek() {
                Some(Token::Comma) => self.advance(),
                Some(Token::RBrace) => {}
                Some(token) => {
                    return Err(self.error(format!("expected ',' or '}}', found {token:?}")));
                }
                None => return Err(self.error("unclosed object")),
            }
        }
    }

    /// Parses: array → "[" (value ("," value)* ","?)? "]"
    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.advance(); // consume [
        let mut items = Vec::new();

        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.advance();
                    return Ok(Value::Array(items));
                }
                Some(Token::Comma) => {
                    // Elided element.
                    self.advance();
                    items.push(Value::Null);
                    continue;
                }
                None => return Err(self.error("unclosed array")),
                Some(_) => {}
            }

            items.push(self.parse_value()?);

            match self.peek() {
                Some(Token::Comma) => self.advance(),
                Some(Token::RBracket) => {}
                Some(token) => {
                    return Err(self.error(format!("expected ',' or ']', found {token:?}")));
                }
                None => return Err(self.error("unclosed array")),
            }
        }
    }

    /// Consumes the current token if it matches `expected`, or fails with `message`.
    fn expect(&mut self, expected: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Checks if the current token matches the expected token.
    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|s| &s.token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Creates an error positioned at the current token, or at end of input.
    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self
            .tokens
            .get(self.index)
            .map_or(self.end, |s| self.base + s.position);
        ParseError::new(message, Some(position))
    }
}

/// Parses the argument list of a registration call: `( value ) ;?`.
///
/// `base` is the byte offset of `input` within the enclosing document and is added to error
/// positions.
pub fn parse_call(input: &str, base: usize) -> Result<Value, ParseError> {
    Parser::new(input, base)?.parse_call()
}

/// Parses a bare value with an optional trailing semicolon.
pub fn parse_value(input: &str) -> Result<Value, ParseError> {
    Parser::new(input, 0)?.parse_bare()
}
