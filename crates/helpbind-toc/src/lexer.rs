//! Lenient tokenizer for TOC definition documents.
//!
//! Accepts the JavaScript object-literal subset that help authoring tools emit: single or double
//! quoted strings with JS escapes, bare identifier keys, signed numbers with fractions and
//! exponents, and `/* */` or `//` comments, which are skipped.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in a definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// A quoted string with escapes decoded.
    Str(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// A bare word: a key, or one of `true`, `false`, `null`, `undefined`.
    Ident(String),
}

/// A token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

/// Tokenizes a definition document.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// The original input, for two-character lookahead.
    input: &'a str,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            input,
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Spanned>, LexError> {
        self.skip_trivia()?;

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match ch {
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '"' | '\'' => self.read_string(ch)?,
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.read_number()?,
            c if is_ident_start(c) => self.read_ident(),
            other => {
                return Err(LexError::new(
                    format!("unexpected character '{other}'"),
                    position,
                ));
            }
        };

        Ok(Some(Spanned { token, position }))
    }

    /// Consumes one character and yields `token`.
    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Reads a string delimited by `quote`, decoding JS escapes.
    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek().copied() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::Str(content));
                }
                Some('\\') => {
                    self.advance();
                    self.read_escape(&mut content, start_pos)?;
                }
                Some('\n') | None => {
                    return Err(LexError::new("unclosed string", start_pos));
                }
                Some(c) => {
                    content.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Decodes the escape sequence following a backslash into `out`.
    fn read_escape(&mut self, out: &mut String, start_pos: usize) -> Result<(), LexError> {
        let Some(c) = self.chars.next() else {
            return Err(LexError::new("unclosed string", start_pos));
        };
        let escape_pos = self.position;
        self.position += c.len_utf8();

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'u' => {
                let code = self.read_hex(4, escape_pos)?;
                // Surrogate pairs arrive as two consecutive escapes.
                if (0xD800..0xDC00).contains(&code) && self.input[self.position..].starts_with("\\u")
                {
                    self.advance();
                    self.advance();
                    let low = self.read_hex(4, escape_pos)?;
                    let decoded = (0xDC00..0xE000)
                        .contains(&low)
                        .then(|| 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
                        .and_then(char::from_u32);
                    out.push(decoded.unwrap_or('\u{FFFD}'));
                } else {
                    out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                }
            }
            'x' => {
                let code = self.read_hex(2, escape_pos)?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            '\n' => {} // line continuation
            other => out.push(other),
        }

        Ok(())
    }

    /// Reads exactly `digits` hex digits.
    fn read_hex(&mut self, digits: usize, escape_pos: usize) -> Result<u32, LexError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexError::new("invalid escape sequence", escape_pos))?;
            value = value * 16 + digit;
            self.advance();
        }
        Ok(value)
    }

    /// Reads a numeric literal: optional sign, digits, fraction and exponent.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        let mut number = String::new();

        if let Some(&sign) = self.chars.peek()
            && (sign == '-' || sign == '+')
        {
            if sign == '-' {
                number.push(sign);
            }
            self.advance();
        }

        let mut seen_digit = false;
        while let Some(&ch) = self.chars.peek() {
            let accept = ch.is_ascii_digit()
                || (ch == '.' && !number.contains('.') && !number.contains(['e', 'E']))
                || ((ch == 'e' || ch == 'E') && seen_digit && !number.contains(['e', 'E']))
                || ((ch == '-' || ch == '+') && number.ends_with(['e', 'E']));
            if !accept {
                break;
            }
            seen_digit |= ch.is_ascii_digit();
            number.push(ch);
            self.advance();
        }

        if !seen_digit {
            return Err(LexError::new("malformed number", start_pos));
        }

        Ok(Token::Number(number))
    }

    /// Reads an identifier.
    fn read_ident(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if !is_ident_continue(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        Token::Ident(word)
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            while let Some(&ch) = self.chars.peek() {
                if ch.is_whitespace() || ch == '\u{feff}' {
                    self.advance();
                } else {
                    break;
                }
            }

            let rest = &self.input[self.position..];
            if rest.starts_with("//") {
                while let Some(&ch) = self.chars.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if rest.starts_with("/*") {
                let start_pos = self.position;
                let Some(end) = rest[2..].find("*/") else {
                    return Err(LexError::new("unclosed comment", start_pos));
                };
                let target = self.position + 2 + end + 2;
                while self.position < target {
                    self.advance();
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Returns true if `c` may start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` may continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenizes a definition document.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}
