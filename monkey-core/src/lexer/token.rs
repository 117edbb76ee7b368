#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // <letter>{<letter>}, letter = a-z | A-Z | _
    Ident(String),
    // {<digit>} — a plain digit run; the parser owns the i64 conversion
    // so an over-long literal surfaces as a parse error, not a lex error
    Int(String),

    // Operators
    Assign,   // =
    Plus,     // +
    Minus,    // -
    Bang,     // !
    Asterisk, // *
    Slash,    // /

    LessThan,    // <
    GreaterThan, // >
    Equal,       // ==
    NotEqual,    // !=

    // Delimiters
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }

    // Keywords
    Function, // fn
    Let,      // let
    True,     // true
    False,    // false
    If,       // if
    Else,     // else
    Return,   // return

    // A byte the lexer does not recognize
    Illegal(char),

    Eof,
}

impl Token {
    pub fn is_keyword(&self) -> bool {
        match self {
            Token::Function
            | Token::Let
            | Token::True
            | Token::False
            | Token::If
            | Token::Else
            | Token::Return => true,
            _ => false,
        }
    }

    pub fn is_operator(&self) -> bool {
        match self {
            Token::Assign
            | Token::Plus
            | Token::Minus
            | Token::Bang
            | Token::Asterisk
            | Token::Slash
            | Token::LessThan
            | Token::GreaterThan
            | Token::Equal
            | Token::NotEqual => true,
            _ => false,
        }
    }

    /// The exact source spelling of the token. `Eof` spells as the empty
    /// string; the two-character operators keep their full run.
    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Int(value) => value.clone(),

            Token::Assign => "=".to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Bang => "!".to_string(),
            Token::Asterisk => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LessThan => "<".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),

            Token::Comma => ",".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),

            Token::Function => "fn".to_string(),
            Token::Let => "let".to_string(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::If => "if".to_string(),
            Token::Else => "else".to_string(),
            Token::Return => "return".to_string(),

            Token::Illegal(ch) => ch.to_string(),
            Token::Eof => "".to_string(),
        }
    }

    /// The kind name used in parser error messages: class tokens and
    /// keywords by name, operators and delimiters by their spelling.
    pub fn kind_literal(&self) -> &'static str {
        match self {
            Token::Ident(_) => "IDENT",
            Token::Int(_) => "INT",

            Token::Assign => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Bang => "!",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::LessThan => "<",
            Token::GreaterThan => ">",
            Token::Equal => "==",
            Token::NotEqual => "!=",

            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",

            Token::Function => "FUNCTION",
            Token::Let => "LET",
            Token::True => "TRUE",
            Token::False => "FALSE",
            Token::If => "IF",
            Token::Else => "ELSE",
            Token::Return => "RETURN",

            Token::Illegal(_) => "ILLEGAL",
            Token::Eof => "EOF",
        }
    }
}
