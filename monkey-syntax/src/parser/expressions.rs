use super::error::{Expected, ParseError};
use super::statements::parse_statement;
use crate::ast::{
    BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind,
};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

pub fn precedence_of(token: &TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pratt loop: parse a prefix expression, then keep folding it into the
/// left operand of every following infix operator that binds tighter than
/// `precedence`.
pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let Some(token) = parser.iter.next() else {
        return Err(ParseError::premature_end_expected_expression());
    };
    let mut left_expression = prefix_parsing(token, parser)?;

    loop {
        let Some(next_token) = parser.iter.peek() else {
            break;
        };

        let statement_ended = next_token.kind == TokenKind::SemiColon;
        if statement_ended || precedence >= precedence_of(&next_token.kind) {
            break;
        }

        let Some(infix_parse_function) = infix_parsing_function(&next_token.kind) else {
            break;
        };
        parser.iter.next();
        left_expression = infix_parse_function(left_expression, parser)?;
    }

    Ok(left_expression)
}

fn prefix_operation(
    parser: &mut Parser,
    kind: PrefixOperationKind,
) -> Result<Expression, ParseError> {
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        match parser.iter.peek() {
            Some(next) if next.kind == terminator => {
                parser.iter.next();
                return Ok(elements);
            }
            None => {
                return Err(ParseError::PrematureEndOfInput {
                    expected: Expected::Token(terminator),
                })
            }
            _ => {
                elements.push(parse_element(parser)?);
            }
        }

        match parser.iter.next() {
            Some(next) if next.kind == separator => continue,
            Some(next) if next.kind == terminator => return Ok(elements),
            next => return Err(ParseError::unexpected_token(terminator, next)),
        }
    }
}

fn parse_array_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expressions = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(expressions))
}

fn parse_hash_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::Comma,
        TokenKind::RBrace,
    )?;
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);

    parser.expect_token(TokenKind::LBrace)?;
    let consequence = parse_block_statement(parser)?;

    let alternative = if parser
        .iter
        .next_if(|token| token.kind == TokenKind::Else)
        .is_some()
    {
        parser.expect_token(TokenKind::LBrace)?;
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

/// Parses statements up to the closing `}`; the opening brace has already
/// been consumed. Semicolons between statements are optional.
pub(crate) fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let mut statements = Vec::new();
    parser.enter_block();

    loop {
        while parser.skip_semicolon() {}

        match parser.iter.peek() {
            Some(Token {
                kind: TokenKind::RBrace,
                ..
            }) => {
                parser.iter.next();
                parser.leave_block();
                return Ok(BlockStatement { statements });
            }
            None => {
                return Err(ParseError::PrematureEndOfInput {
                    expected: Expected::Token(TokenKind::RBrace),
                })
            }
            Some(_) => statements.push(parse_statement(parser)?),
        }
    }
}

fn parse_function_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident().map(|name| Identifier { name }),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    parser.expect_token(TokenKind::LBrace)?;
    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        parameters: parameters.into(),
        body: body.into(),
    })
}

pub fn prefix_parsing(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident(name) => Ok(Expression::Identifier(Identifier { name })),
        TokenKind::Int(val) => val
            .parse()
            .map(Expression::IntegerLiteral)
            .map_err(|_| ParseError::InvalidInteger(val)),
        TokenKind::String(val) => Ok(Expression::StringLiteral(val)),
        TokenKind::True => Ok(Expression::BooleanLiteral(true)),
        TokenKind::False => Ok(Expression::BooleanLiteral(false)),
        TokenKind::Bang => prefix_operation(parser, PrefixOperationKind::Bang),
        TokenKind::Minus => prefix_operation(parser, PrefixOperationKind::Minus),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::LBracket => parse_array_literal(parser),
        TokenKind::LBrace => parse_hash_literal(parser),
        TokenKind::If => parse_if_expression(parser),
        TokenKind::Function => parse_function_literal(parser),
        TokenKind::Illegal(text) => Err(ParseError::IllegalToken(text)),
        _ => Err(ParseError::NoPrefixFunction(token)),
    }
}

type InfixFunction = Box<dyn FnOnce(Expression, &mut Parser) -> Result<Expression, ParseError>>;

fn infix_operation(precedence: Precedence, kind: InfixOperationKind) -> InfixFunction {
    Box::new(
        move |left: Expression, parser: &mut Parser| -> Result<Expression, ParseError> {
            Ok(Expression::InfixOperation(
                kind,
                Box::new(left),
                Box::new(parse_expression(parser, precedence)?),
            ))
        },
    )
}

fn parse_call_function(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}

pub fn infix_parsing_function(token: &TokenKind) -> Option<InfixFunction> {
    use InfixOperationKind as InfixKind;

    let kind = match token {
        TokenKind::Plus => InfixKind::Plus,
        TokenKind::Minus => InfixKind::Minus,
        TokenKind::LessThan => InfixKind::LessThan,
        TokenKind::GreaterThan => InfixKind::GreaterThan,
        TokenKind::Equal => InfixKind::Equal,
        TokenKind::NotEqual => InfixKind::NotEqual,
        TokenKind::Asterisk => InfixKind::Multiply,
        TokenKind::Slash => InfixKind::Divide,
        TokenKind::LParen => return Some(Box::new(parse_call_function)),
        TokenKind::LBracket => return Some(Box::new(parse_index_expression)),
        _ => return None,
    };
    Some(infix_operation(precedence_of(token), kind))
}
