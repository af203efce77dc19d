pub mod error;
pub mod expressions;
pub mod statements;

use std::rc::Rc;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::ParseError;
use statements::parse_statement;

/// Recursive descent parser over a token stream with one token of lookahead.
///
/// Syntax errors do not stop parsing: each one is recorded, the parser skips
/// to the end of the broken statement and carries on with the next one.
pub struct Parser<'a> {
    pub iter: std::iter::Peekable<Tokenizer<'a>>,
    /// Blocks whose `{` has been consumed but whose `}` has not.
    open_blocks: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self {
            iter,
            open_blocks: 0,
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    pub(crate) fn skip_semicolon(&mut self) -> bool {
        self.iter
            .next_if(|token| token.kind == TokenKind::SemiColon)
            .is_some()
    }

    pub(crate) fn enter_block(&mut self) {
        self.open_blocks += 1;
    }

    pub(crate) fn leave_block(&mut self) {
        self.open_blocks = self.open_blocks.saturating_sub(1);
    }

    /// Drops tokens up to and including the next top-level `;`.
    ///
    /// Blocks that were still open when the error happened count as nesting,
    /// so recovery skips the rest of them too.
    fn synchronize(&mut self) {
        let mut depth = std::mem::take(&mut self.open_blocks) as i32;
        for token in self.iter.by_ref() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::SemiColon if depth <= 0 => break,
                _ => {}
            }
        }
    }

    /// Parses the whole input, returning every statement that parsed
    /// cleanly together with all the errors that were found.
    pub fn parse_program_partial(&mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        loop {
            while self.skip_semicolon() {}
            if self.iter.peek().is_none() {
                break;
            }

            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    tracing::debug!(%err, position = ?err.position(), "parse error");
                    errors.push(err);
                    self.synchronize();
                }
            }
        }

        (Program { statements }, errors)
    }

    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let (program, errors) = self.parse_program_partial();
        if errors.is_empty() {
            Ok(program)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ParseError, Parser};
    use crate::ast::{Expression, Statement};
    use crate::lexer::{TokenKind, Tokenizer};

    fn parse(input: &str) -> crate::ast::Program {
        Parser::new(Tokenizer::new(input))
            .parse_program()
            .unwrap_or_else(|errors| panic!("{input:?} failed to parse: {errors:?}"))
    }

    fn parse_errors(input: &str) -> Vec<String> {
        let (_, errors) = Parser::new(Tokenizer::new(input)).parse_program_partial();
        errors.iter().map(ParseError::to_string).collect()
    }

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            assert_eq!(parse(input).to_string(), expected, "input: {input}")
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouped_expressions() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_and_index_bind_tightest() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
            ("f(x)(y)", "f(x)(y)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;"),
            ("let y = true", "let y = true;"),
            ("let foobar = y;", "let foobar = y;"),
            ("return 5;", "return 5;"),
            ("return x + y", "return (x + y);"),
            ("let a = 1;;; a", "let a = 1;\na"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) { x }"),
            ("if x < y { x } else { y }", "if (x < y) { x } else { y }"),
            (
                "if (a) { if (b) { return 10; } } return 1;",
                "if a { if b { return 10; } }\nreturn 1;",
            ),
            ("if (a) { let b = 1 b }", "if a { let b = 1; b }"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn(x, y) { x + y; }", "fn(x, y) { (x + y) }"),
            ("fn() {}", "fn() { }"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) { (person[\"name\"]) };",
            ),
            ("fn(x) { x }(5)", "fn(x) { x }(5)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_collection_literals() {
        let tests = vec![
            ("[]", "[]"),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)]"),
            ("{}", "{}"),
            (
                "{\"one\": 1, \"two\": 2, true: 3}",
                "{\"one\": 1, \"two\": 2, true: 3}",
            ),
            ("{\"one\": 0 + 1, 2: 10 - 8}", "{\"one\": (0 + 1), 2: (10 - 8)}"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_literal_values() {
        let program = parse("5; \"hello world\"; false");

        assert_eq!(
            program.statements,
            vec![
                Statement::Expression(Expression::IntegerLiteral(5)),
                Statement::Expression(Expression::StringLiteral("hello world".into())),
                Statement::Expression(Expression::BooleanLiteral(false)),
            ]
        );
    }

    #[test]
    fn test_errors_are_collected() {
        assert_eq!(
            parse_errors("let x 5; let = 10; let 838383;"),
            vec![
                "expected next token to be =, got INT instead",
                "expected next token to be IDENT, got = instead",
                "expected next token to be IDENT, got INT instead",
            ]
        );
    }

    #[test]
    fn test_missing_tokens() {
        assert_eq!(
            parse_errors("(1 + 2"),
            vec!["expected next token to be ), got EOF instead"]
        );
        assert_eq!(
            parse_errors("if (x) 1"),
            vec!["expected next token to be {, got INT instead"]
        );
        assert_eq!(
            parse_errors("}"),
            vec!["no prefix parse function for } found"]
        );
        assert_eq!(
            parse_errors("99999999999999999999"),
            vec!["could not parse 99999999999999999999 as integer"]
        );
        assert_eq!(parse_errors("1 + @"), vec!["illegal token: @"]);
    }

    #[test]
    fn test_partial_program_survives_errors() {
        let (program, errors) = Parser::new(Tokenizer::new(
            "let x = 1; let = 2; let f = fn() { x + ; }; x",
        ))
        .parse_program_partial();

        assert_eq!(errors.len(), 2);
        assert_eq!(program.to_string(), "let x = 1;\nx");
        assert!(matches!(
            &errors[1],
            ParseError::NoPrefixFunction(token) if token.kind == TokenKind::SemiColon
        ));
    }

    #[test]
    fn test_recovery_skips_the_rest_of_an_open_block() {
        let (program, errors) =
            Parser::new(Tokenizer::new("let f = fn() { let = 1; 2 }; f()")).parse_program_partial();

        assert_eq!(
            errors.iter().map(ParseError::to_string).collect::<Vec<_>>(),
            vec!["expected next token to be IDENT, got = instead"]
        );
        assert_eq!(program.to_string(), "f()");

        let (program, errors) = Parser::new(Tokenizer::new(
            "if (a) { if (b) { let 1; x; y } z; }; let c = fn() { 1 }; c",
        ))
        .parse_program_partial();

        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "let c = fn() { 1 };\nc");
    }
}
