// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            errors: Vec::new(),
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            '.' => self.make_token(TokenType::Dot),
            ';' => self.make_token(TokenType::Semicolon),
            '%' => self.make_token(TokenType::Percent),
            '+' => self.either('=', TokenType::PlusEq, TokenType::Plus),
            '-' => self.either('=', TokenType::MinusEq, TokenType::Minus),
            '*' => self.either('=', TokenType::StarEq, TokenType::Star),
            '=' => self.either('=', TokenType::EqEq, TokenType::Eq),
            '<' => self.either('=', TokenType::LtEq, TokenType::Lt),
            '>' => self.either('=', TokenType::GtEq, TokenType::Gt),
            '!' if self.match_char('=') => self.make_token(TokenType::BangEq),
            '&' if self.match_char('&') => self.make_token(TokenType::AmpAmp),
            '|' if self.match_char('|') => self.make_token(TokenType::PipePipe),

            // Slash or comment
            '/' => {
                if self.match_char('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                    self.next_token()
                } else {
                    self.either('=', TokenType::SlashEq, TokenType::Slash)
                }
            }

            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => self.identifier(),
            _ => self.error_unexpected_char(c),
        }
    }

    /// Lex the whole input, stopping before `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            match token.ty {
                TokenType::Eof => break,
                TokenType::Error => {}
                _ => tokens.push(token),
            }
        }
        (tokens, self.errors)
    }

    /// Skip whitespace, including newlines
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Peek at the character after the next one
    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current..].chars();
        iter.next();
        iter.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// `long` if the next character is `next`, otherwise `short`.
    fn either(&mut self, next: char, long: TokenType, short: TokenType) -> Token {
        if self.match_char(next) {
            self.make_token(long)
        } else {
            self.make_token(short)
        }
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.current, self.start_line, self.start_column)
    }

    fn make_token(&self, ty: TokenType) -> Token {
        Token::new(ty, &self.source[self.start..self.current], self.span())
    }

    /// Create an error token and collect an error for an unexpected character.
    fn error_unexpected_char(&mut self, c: char) -> Token {
        let span = self.span();
        self.errors.push(LexerError::UnexpectedCharacter {
            ch: c,
            span: span.into(),
        });
        Token::new(TokenType::Error, format!("unexpected character '{c}'"), span)
    }

    fn error_unterminated_string(&mut self) -> Token {
        let span = self.span();
        self.errors
            .push(LexerError::UnterminatedString { span: span.into() });
        Token::new(TokenType::Error, "unterminated string literal", span)
    }

    fn error_invalid_number(&mut self) -> Token {
        let span = self.span();
        self.errors.push(LexerError::InvalidNumber { span: span.into() });
        Token::new(TokenType::Error, "invalid number literal", span)
    }

    fn identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }
        let text = &self.source[self.start..self.current];
        let ty = Self::keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }

    fn keyword_type(text: &str) -> Option<TokenType> {
        match text {
            "new" => Some(TokenType::KwNew),
            "return" => Some(TokenType::KwReturn),
            "break" => Some(TokenType::KwBreak),
            "continue" => Some(TokenType::KwContinue),
            "final" => Some(TokenType::KwFinal),
            "true" => Some(TokenType::KwTrue),
            "false" => Some(TokenType::KwFalse),
            "null" => Some(TokenType::KwNull),
            "boolean" => Some(TokenType::KwBoolean),
            "char" => Some(TokenType::KwChar),
            "int" => Some(TokenType::KwInt),
            "long" => Some(TokenType::KwLong),
            "float" => Some(TokenType::KwFloat),
            "double" => Some(TokenType::KwDouble),
            _ => None,
        }
    }

    /// Scan a number: digits, an optional fraction, an optional `L`, `f` or
    /// `d` suffix. Integers must fit in 64 bits.
    fn number(&mut self) -> Token {
        self.digits();
        let mut float = false;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.digits();
            float = true;
        }
        match self.peek() {
            Some('f' | 'F' | 'd' | 'D') => {
                self.advance();
                float = true;
            }
            Some('l' | 'L') if !float => {
                self.advance();
            }
            _ => {}
        }
        if float {
            return self.make_token(TokenType::FloatLiteral);
        }
        let text = &self.source[self.start..self.current];
        if text.trim_end_matches(['l', 'L']).parse::<i64>().is_err() {
            return self.error_invalid_number();
        }
        self.make_token(TokenType::IntLiteral)
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Scan a string literal; the lexeme keeps its quotes and escapes.
    fn string(&mut self) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => return self.error_unterminated_string(),
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenType::StringLiteral);
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

/// Lex `source`, failing with every lexical error found.
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<LexerError>> {
    let (tokens, errors) = Lexer::new(source).tokenize();
    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}
