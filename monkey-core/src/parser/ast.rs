use std::fmt::Display;
use std::rc::Rc;

use crate::{
    lexer::prelude::{Spanned, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

// program -> { <statement> }
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }

        Ok(())
    }
}

// statement -> <let> | <return> | <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(Let),
    Return(Return),
    Expression(Expression),
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let statement = match parser.current_token.1 {
            Token::Let => Self::Let(Let::parse(parser, None)?),
            Token::Return => Self::Return(Return::parse(parser, None)?),
            _ => {
                let expression = Expression::parse(parser, None)?;

                if parser.current_token.1 == Token::Semicolon {
                    parser.step();
                }

                Self::Expression(expression)
            }
        };

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Let(let_) => write!(f, "{let_}"),
            Self::Return(return_) => write!(f, "{return_}"),
            Self::Expression(expression) => write!(f, "{expression}")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Let(let_) => let_.location,
            Self::Return(return_) => return_.location,
            Self::Expression(expression) => expression.location()
        }
    }
}

// let -> let <identifier> = <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Let {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Let)?;

        let name = Identifier::from(parser.expect_ident()?);

        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let mut end = value.location().end;

        if parser.current_token.1 == Token::Semicolon {
            end = parser.next_token().2;
        }

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Let {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

// return -> return <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = Expression::parse(parser, None)?;
        let mut end = value.location().end;

        if parser.current_token.1 == Token::Semicolon {
            end = parser.next_token().2;
        }

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

// block -> { <statement> }
//
// Only `if` arms and function bodies produce blocks; a stray `{` at
// statement position is a plain parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, mut end) = parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        loop {
            match parser.current_token.1 {
                Token::RBrace => {
                    end = parser.next_token().2;
                    break;
                }
                Token::Eof => {
                    end = parser.current_token.2;
                    break;
                }
                _ => statements.push(Statement::parse(parser, None)?),
            }
        }

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, "{statement};")?;
        }
        write!(f, "}}")
    }
}

// expression -> <identifier> | <primitive> | <prefix> | <infix>
//             | <conditional> | <function> | <call> | "(" <expression> ")"
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Prefix(Prefix),
    Infix(Infix),
    If(Conditional),
    Function(FunctionLiteral),
    Call(Call),
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut expression = match &parser.current_token {
            (_, Token::Ident(_), _) => {
                Self::Identifier(Identifier::from(parser.expect_ident()?))
            },
            (_, Token::Int(_) | Token::True | Token::False, _) => {
                Self::Primitive(Primitive::parse(parser, None)?)
            },
            (_, Token::Bang | Token::Minus, _) => {
                Self::Prefix(Prefix::parse(parser, None)?)
            },
            (_, Token::LParen, _) => {
                // grouping only guides precedence, it leaves no node behind
                parser.expect_one(Token::LParen)?;
                let expression = Expression::parse(parser, None)?;
                parser.expect_one(Token::RParen)?;

                expression
            },
            (_, Token::If, _) => Self::If(Conditional::parse(parser, None)?),
            (_, Token::Function, _) => {
                Self::Function(FunctionLiteral::parse(parser, None)?)
            },
            (start, token, end) => return parse_error(
                ParseErrorType::NoPrefixParser { token: token.clone() },
                SrcSpan { start: *start, end: *end }
            )
        };

        while parser.current_token.1 != Token::Semicolon &&
            precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence()
        {
            expression = match parser.current_token.1 {
                Token::Plus | Token::Minus | Token::Asterisk | Token::Slash |
                Token::Equal | Token::NotEqual |
                Token::LessThan | Token::GreaterThan => {
                    Self::Infix(Infix::parse(parser, expression, precedence)?)
                },
                Token::LParen => {
                    Self::Call(Call::parse(parser, expression, precedence)?)
                },
                _ => {
                    let (start, token, end) = parser.current_token.clone();
                    parser.errors.push(ParseError {
                        error: ParseErrorType::NoInfixParser { token },
                        span: SrcSpan { start, end },
                    });
                    break;
                }
            }
        }

        Ok(expression)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::If(conditional) => write!(f, "{conditional}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Call(call) => write!(f, "{call}")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(identifier) => identifier.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Prefix(prefix) => prefix.location,
            Self::Infix(infix) => infix.location,
            Self::If(conditional) => conditional.location,
            Self::Function(function) => function.location,
            Self::Call(call) => call.location
        }
    }
}

// identifier -> <letter> { <letter> }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// primitive -> <int> | <bool>
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int {
        value: i64,
        location: SrcSpan
    },
    Bool {
        value: bool,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Primitive {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, token, end) = parser.next_token();
        let location = SrcSpan { start, end };

        match token {
            Token::Int(literal) => match literal.parse::<i64>() {
                Ok(value) => Ok(Self::Int { value, location }),
                Err(_) => parse_error(
                    ParseErrorType::InvalidIntegerLiteral { literal },
                    location
                )
            },
            Token::True => Ok(Self::Bool { value: true, location }),
            Token::False => Ok(Self::Bool { value: false, location }),
            got => parse_error(
                ParseErrorType::UnexpectedToken { expected: "INT", got },
                location
            )
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Bool { value, .. } => write!(f, "{value}")
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. } |
            Self::Bool { location, .. } => *location
        }
    }
}

// prefix -> ("!" | "-") <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: Token,
    pub expression: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Prefix {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, operator, _) = parser.next_token();

        let expression = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = expression.location().end;

        Ok(Self {
            operator,
            expression: Box::new(expression),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.as_literal(), self.expression)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let start = left.location().start;
        let (_, operator, _) = parser.next_token();

        // equal precedence does not continue, so chains lean left
        let right = Expression::parse(parser, Some(precedence))?;
        let end = right.location().end;

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.as_literal(), self.right)
    }
}

// conditional -> if ( <expression> ) <block> [else <block>]
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Conditional {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let consequence = Block::parse(parser, None)?;
        let mut end = consequence.location.end;

        let alternative = match parser.current_token.1 {
            Token::Else => {
                parser.step();

                let block = Block::parse(parser, None)?;
                end = block.location.end;

                Some(block)
            },
            _ => None
        };

        Ok(Self {
            condition: Box::new(condition),
            consequence,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Conditional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;

        if let Some(alternative) = &self.alternative {
            write!(f, " else {alternative}")?;
        }

        Ok(())
    }
}

// function -> fn ( [<identifier> {, <identifier>}] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Identifier>,
    // shared so every closure built from this literal reuses one body tree
    pub body: Rc<Block>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;

        parser.expect_one(Token::LParen)?;

        let mut params = vec![];

        if parser.current_token.1 == Token::RParen {
            parser.step();
        } else {
            loop {
                match parser.current_token.1 {
                    Token::Ident(_) => params.push(Identifier::from(parser.expect_ident()?)),
                    _ => {
                        let (start, token, end) = parser.current_token.clone();
                        return parse_error(
                            ParseErrorType::UnexpectedParameter { token },
                            SrcSpan { start, end }
                        );
                    }
                }

                match parser.current_token.1 {
                    Token::Comma => parser.step(),
                    Token::RParen => {
                        parser.step();
                        break;
                    },
                    _ => {
                        let (start, token, end) = parser.current_token.clone();
                        return parse_error(
                            ParseErrorType::UnexpectedParameter { token },
                            SrcSpan { start, end }
                        );
                    }
                }
            }
        }

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            params,
            body: Rc::new(body),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.value.clone())
            .collect::<Vec<String>>();

        write!(f, "fn ({}) {}", params.join(", "), self.body)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        parser.expect_one(Token::LParen)?;

        let mut arguments = vec![];

        let end = if parser.current_token.1 == Token::RParen {
            parser.next_token().2
        } else {
            arguments.push(Expression::parse(parser, None)?);

            while parser.current_token.1 == Token::Comma {
                parser.step();
                arguments.push(Expression::parse(parser, None)?);
            }

            parser.expect_one(Token::RParen)?.1
        };

        Ok(Self {
            function: Box::new(left),
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.function, arguments.join(", "))
    }
}
