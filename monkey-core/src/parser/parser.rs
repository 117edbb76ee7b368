use crate::{lexer::prelude::{Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType, parse_error};
use super::ast::{Expression, Program, Statement};

pub trait Parse<T: Iterator<Item = Spanned>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = Spanned>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = Spanned>> {
    pub current_token: Spanned,
    pub next_token: Spanned,
    pub errors: Vec<ParseError>,

    tokens: T,
}

impl<T: Iterator<Item = Spanned>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: (0, Token::Eof, 0),
            next_token: (0, Token::Eof, 0),
            errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    /// Advances the window by one token and returns the token that was
    /// current. A finite token stream is padded with `Eof`.
    pub fn next_token(&mut self) -> Spanned {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => {
                let end = self.next_token.2;
                (end, Token::Eof, end)
            }
        };

        let current = std::mem::replace(&mut self.next_token, next);
        std::mem::replace(&mut self.current_token, current)
    }

    pub fn current_precedence(&self) -> Precedence {
        Precedence::from(&self.current_token.1)
    }

    /// Parses the whole token stream into a program. Parse errors are
    /// accumulated on the parser; after a failed production the parser
    /// resynchronises at the next statement boundary and keeps going.
    pub fn parse(&mut self) -> Program {
        let start = self.current_token.0;
        let mut statements = vec![];

        while self.current_token.1 != Token::Eof {
            match Statement::parse(self, None) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.errors.push(error);
                    self.recover();
                }
            }
        }

        let end = self.current_token.2;

        Program {
            statements,
            location: SrcSpan { start, end },
        }
    }

    fn recover(&mut self) {
        while !matches!(self.current_token.1, Token::Semicolon | Token::Eof) {
            self.step();
        }

        if self.current_token.1 == Token::Semicolon {
            self.step();
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        if self.current_token.1 == token {
            let (start, _, end) = self.next_token();
            Ok((start, end))
        } else {
            let (start, got, end) = self.current_token.clone();

            parse_error(
                ParseErrorType::UnexpectedToken {
                    expected: token.kind_literal(),
                    got,
                },
                SrcSpan { start, end }
            )
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token {
            (_, Token::Ident(_), _) => {
                let (start, token, end) = self.next_token();
                match token {
                    Token::Ident(value) => Ok((start, value, end)),
                    _ => unreachable!(),
                }
            }
            _ => {
                let (start, got, end) = self.current_token.clone();

                parse_error(
                    ParseErrorType::UnexpectedToken { expected: "IDENT", got },
                    SrcSpan { start, end }
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Asterisk | Token::Slash => Self::Product,
            Token::LParen => Self::Call,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_module(src: &str) -> Result<Program, Vec<ParseError>> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);
    let program = parser.parse();

    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}
