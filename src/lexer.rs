use std::fmt;

use crate::{
    ast::{Spanned, Token},
    error::{LexError, LexErrorKind},
};

/// Location of a character in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub struct Lexer {
    input: Vec<char>,
    index: usize,
    position: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            index: 0,
            position: Position::start(),
        }
    }

    /// Tokenizes the whole input. The last token is always [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.index + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.index += 1;
            self.position.offset += ch.len_utf8();
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, position: Position, reason: LexErrorKind) -> LexError {
        LexError { position, reason }
    }

    fn is_word_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_'
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a `"`-delimited string. There are no escapes: the literal ends at
    /// the next double quote.
    fn read_string(&mut self, start: Position) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '"' {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(self.error(start, LexErrorKind::UnterminatedString))
    }

    fn read_number(&mut self, start: Position) -> Result<Token, LexError> {
        let mut number = String::new();
        let mut is_decimal = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !is_decimal {
                is_decimal = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Anything glued to the number (`1.2.3`, `12abc`, `5.`) makes it malformed.
        let trailing_garbage = self
            .current_char()
            .is_some_and(|c| Self::is_word_char(c) || c == '.');
        if trailing_garbage || number.ends_with('.') {
            while let Some(ch) = self.current_char() {
                if Self::is_word_char(ch) || ch == '.' {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return Err(self.error(start, LexErrorKind::MalformedNumber(number)));
        }

        let parsed = if is_decimal {
            number.parse::<f64>().ok().map(Token::Decimal)
        } else {
            number.parse::<i64>().ok().map(Token::Integer)
        };
        parsed.ok_or_else(|| self.error(start, LexErrorKind::MalformedNumber(number)))
    }

    fn symbol(&mut self, token: Token, width: usize) -> Token {
        for _ in 0..width {
            self.advance();
        }
        token
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();

        let start = self.position;
        let start_index = self.index;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.symbol(Token::LParen, 1),
            Some(')') => self.symbol(Token::RParen, 1),
            Some('[') => self.symbol(Token::LBracket, 1),
            Some(']') => self.symbol(Token::RBracket, 1),
            Some(',') => self.symbol(Token::Comma, 1),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.symbol(Token::EqEq, 2)
                } else {
                    self.symbol(Token::Eq, 1)
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.symbol(Token::NotEq, 2)
                } else {
                    self.symbol(Token::Bang, 1)
                }
            }
            Some('~') => {
                if self.peek_char(1) == Some('=') {
                    self.symbol(Token::NotEq, 2)
                } else {
                    self.symbol(Token::Tilde, 1)
                }
            }
            Some('<') => match self.peek_char(1) {
                Some('=') => self.symbol(Token::LtEq, 2),
                Some('>') => self.symbol(Token::NotEq, 2),
                _ => self.symbol(Token::Lt, 1),
            },
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.symbol(Token::GtEq, 2)
                } else {
                    self.symbol(Token::Gt, 1)
                }
            }
            Some('"') => Token::String(self.read_string(start)?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(start)?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(start)?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => Token::Word(self.read_word()),
            Some(ch) => return Err(self.error(start, LexErrorKind::UnexpectedCharacter(ch))),
        };

        let lexeme: String = self.input[start_index..self.index].iter().collect();
        tracing::trace!(?token, offset = start.offset, "token");
        Ok(Spanned {
            token,
            lexeme,
            position: start,
        })
    }
}

/// Tokenizes `text` in one call.
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(text).tokenize()
}

#[test]
fn test_symbols() {
    let tokens: Vec<Token> = tokenize("= == != <> ~= < <= > >= ! ~ ( ) [ ] ,")
        .unwrap()
        .into_iter()
        .map(|s| s.token)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::Eq,
            Token::EqEq,
            Token::NotEq,
            Token::NotEq,
            Token::NotEq,
            Token::Lt,
            Token::LtEq,
            Token::Gt,
            Token::GtEq,
            Token::Bang,
            Token::Tilde,
            Token::LParen,
            Token::RParen,
            Token::LBracket,
            Token::RBracket,
            Token::Comma,
            Token::Eof,
        ]
    );
}

#[test]
fn test_positions_track_lines() {
    let tokens = tokenize("a = 1\n  AND b = 2").unwrap();
    let and = &tokens[3];
    assert_eq!(and.token, Token::Word("AND".to_string()));
    assert_eq!(and.position.line, 2);
    assert_eq!(and.position.column, 3);
    assert_eq!(and.position.offset, 8);
}
