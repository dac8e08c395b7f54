//! Line-buffered lexer for Mython source text.
//!
//! Input is processed one logical line at a time: indentation transitions
//! become `Indent`/`Dedent` tokens, blank and comment-only lines are
//! invisible to indentation tracking, and the stream ends with the closing
//! `Dedent` run followed by a single terminal `Eof`.

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Indentation of {spaces} spaces is not a multiple of two at position {position}")]
    OddIndent { spaces: usize, position: usize },
    #[error("Unterminated string literal at position {position}")]
    UnterminatedString { position: usize },
    #[error("Line break inside string literal at position {position}")]
    LineBreakInString { position: usize },
    #[error("Unrecognized escape sequence '\\{escape}' at position {position}")]
    UnknownEscape { escape: char, position: usize },
    #[error("Invalid integer literal '{literal}' at position {position}")]
    InvalidIntegerLiteral { literal: String, position: usize },
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: Token },
}

pub type LexResult<T> = Result<T, LexError>;

/// Streaming tokenizer over a source string.
///
/// Tokens accumulate in a growing buffer behind a read cursor, so one
/// logical line is lexed each time the buffer runs dry. Construction lexes
/// the first line, which makes [`Lexer::current_token`] immediately legal.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    current: usize,
    indent: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> LexResult<Self> {
        let mut lexer = Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            current: 0,
            indent: 0,
        };
        lexer.read_logical_line()?;
        Ok(lexer)
    }

    /// The token most recently advanced to.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Advances one token and returns it. Once `Eof` is current, further
    /// calls keep returning `Eof`.
    pub fn next_token(&mut self) -> LexResult<Token> {
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        } else if !matches!(self.current_token(), Token::Eof) {
            self.read_logical_line()?;
        }
        Ok(self.current_token().clone())
    }

    /// Asserts the current token equals `expected`, payload included.
    pub fn expect(&self, expected: &Token) -> LexResult<()> {
        if self.current_token() == expected {
            Ok(())
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    /// Asserts the current token is an identifier and returns its name.
    pub fn expect_id(&self) -> LexResult<&str> {
        match self.current_token() {
            Token::Id(name) => Ok(name),
            _ => Err(self.unexpected("Id".to_string())),
        }
    }

    /// Asserts the current token is a number literal and returns its value.
    pub fn expect_number(&self) -> LexResult<i32> {
        match self.current_token() {
            Token::Number(value) => Ok(*value),
            _ => Err(self.unexpected("Number".to_string())),
        }
    }

    /// Asserts the current token is a string literal and returns its value.
    pub fn expect_string(&self) -> LexResult<&str> {
        match self.current_token() {
            Token::String(value) => Ok(value),
            _ => Err(self.unexpected("String".to_string())),
        }
    }

    /// Advances one token, then asserts it equals `expected`.
    pub fn expect_next(&mut self, expected: &Token) -> LexResult<()> {
        self.next_token()?;
        self.expect(expected)
    }

    /// Advances one token, then asserts it is an identifier.
    pub fn expect_next_id(&mut self) -> LexResult<&str> {
        self.next_token()?;
        self.expect_id()
    }

    /// Advances one token, then asserts it is a number literal.
    pub fn expect_next_number(&mut self) -> LexResult<i32> {
        self.next_token()?;
        self.expect_number()
    }

    /// Advances one token, then asserts it is a string literal.
    pub fn expect_next_string(&mut self) -> LexResult<&str> {
        self.next_token()?;
        self.expect_string()
    }

    fn unexpected(&self, expected: String) -> LexError {
        LexError::UnexpectedToken {
            expected,
            found: self.current_token().clone(),
        }
    }

    /// Reads logical lines until at least one token lands in the buffer.
    /// Blank and comment-only lines are skipped without touching the
    /// indentation depth; end of input closes every open indentation level
    /// and emits the terminal `Eof`.
    fn read_logical_line(&mut self) -> LexResult<()> {
        loop {
            while self.peek_char() == Some('\n') {
                self.consume_char();
            }
            let indent_start = self.pos;
            let spaces = self.consume_while(|c| c == ' ');
            if spaces % 2 != 0 {
                return Err(LexError::OddIndent {
                    spaces,
                    position: indent_start,
                });
            }

            let line = self.read_line_tokens()?;
            self.current = self.tokens.len();

            if line.is_empty() {
                for _ in 0..self.indent {
                    self.tokens.push(Token::Dedent);
                }
                self.indent = 0;
                self.tokens.push(Token::Eof);
                return Ok(());
            }
            if line.iter().all(|token| matches!(token, Token::Newline)) {
                continue;
            }

            let level = spaces / 2;
            if level > self.indent {
                for _ in 0..(level - self.indent) {
                    self.tokens.push(Token::Indent);
                }
            } else {
                for _ in 0..(self.indent - level) {
                    self.tokens.push(Token::Dedent);
                }
            }
            self.indent = level;
            self.tokens.extend(line);
            return Ok(());
        }
    }

    /// Lexes one physical line after its indentation, through the
    /// terminating newline. A line cut short by end of input still gets a
    /// `Newline`; an empty vector means the input itself is exhausted.
    fn read_line_tokens(&mut self) -> LexResult<Vec<Token>> {
        let mut line = Vec::new();
        loop {
            let Some(ch) = self.peek_char() else {
                if !line.is_empty() {
                    line.push(Token::Newline);
                }
                return Ok(line);
            };
            match ch {
                '\n' => {
                    self.consume_char();
                    line.push(Token::Newline);
                    return Ok(line);
                }
                ' ' => {
                    self.consume_while(|c| c == ' ');
                }
                '#' => {
                    self.consume_while(|c| c != '\n');
                }
                '"' | '\'' => line.push(self.read_string(ch)?),
                c if c.is_ascii_digit() => line.push(self.read_number()?),
                c if c.is_alphabetic() || c == '_' => line.push(self.read_identifier()),
                c => {
                    self.consume_char();
                    if matches!(c, '!' | '=' | '<' | '>') && self.peek_char() == Some('=') {
                        self.consume_char();
                        line.push(match c {
                            '!' => Token::NotEq,
                            '=' => Token::Eq,
                            '<' => Token::LessOrEq,
                            _ => Token::GreaterOrEq,
                        });
                    } else {
                        line.push(Token::Char(c));
                    }
                }
            }
        }
    }

    fn read_string(&mut self, quote: char) -> LexResult<Token> {
        let start = self.pos;
        self.consume_char();
        let mut value = String::new();
        loop {
            let Some(ch) = self.consume_char() else {
                return Err(LexError::UnterminatedString { position: start });
            };
            if ch == quote {
                return Ok(Token::String(value));
            }
            match ch {
                '\\' => {
                    let escape_position = self.pos;
                    let Some(escape) = self.consume_char() else {
                        return Err(LexError::UnterminatedString { position: start });
                    };
                    match escape {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '"' => value.push('"'),
                        '\'' => value.push('\''),
                        '\\' => value.push('\\'),
                        other => {
                            return Err(LexError::UnknownEscape {
                                escape: other,
                                position: escape_position,
                            });
                        }
                    }
                }
                '\n' | '\r' => {
                    return Err(LexError::LineBreakInString { position: start });
                }
                other => value.push(other),
            }
        }
    }

    fn read_number(&mut self) -> LexResult<Token> {
        let start = self.pos;
        self.consume_while(|c| c.is_ascii_digit());
        let literal = &self.input[start..self.pos];
        let value = literal
            .parse::<i32>()
            .map_err(|_| LexError::InvalidIntegerLiteral {
                literal: literal.to_string(),
                position: start,
            })?;
        Ok(Token::Number(value))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos;
        self.consume_while(|c| c.is_alphanumeric() || c == '_');
        let word = &self.input[start..self.pos];
        Token::keyword(word).unwrap_or_else(|| Token::Id(word.to_string()))
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn consume_while<P>(&mut self, keep: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !keep(ch) {
                break;
            }
            self.consume_char();
        }
        self.pos - start
    }
}

/// Lexes `input` to completion, returning every token through the terminal
/// `Eof`.
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = vec![lexer.current_token().clone()];
    while !matches!(tokens.last(), Some(Token::Eof)) {
        tokens.push(lexer.next_token()?);
    }
    Ok(tokens)
}
