use crate::{lexer::prelude::Token, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    UnexpectedToken {
        expected: &'static str,
        got: Token,
    },
    InvalidIntegerLiteral {
        literal: String,
    },
    NoPrefixParser {
        token: Token,
    },
    NoInfixParser {
        token: Token,
    },
    UnexpectedParameter {
        token: Token,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan,
}

impl ParseError {
    /// The human-readable form the REPL lists after `Found N error(s):`.
    pub fn message(&self) -> String {
        match &self.error {
            ParseErrorType::UnexpectedToken { expected, got } => {
                format!(
                    "next token is expected to be {:?}, got: {:?}",
                    expected,
                    got.kind_literal()
                )
            }
            ParseErrorType::InvalidIntegerLiteral { literal } => {
                format!("cannot parse {literal:?} as integer")
            }
            ParseErrorType::NoPrefixParser { token } => {
                format!("no prefix parser function for {}", token.kind_literal())
            }
            ParseErrorType::NoInfixParser { token } => {
                format!("no infix parser function for {}", token.kind_literal())
            }
            ParseErrorType::UnexpectedParameter { token } => {
                format!(
                    "unexpected token at function parameter list: {:?}",
                    token.as_literal()
                )
            }
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
