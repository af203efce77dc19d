//! Front end of the Monkey interpreter: tokenizer, parser and syntax tree.

pub mod ast;
pub mod lexer;
pub mod parser;

/// Tokenizes and parses `source` in one go.
pub fn parse(source: &str) -> Result<ast::Program, Vec<parser::ParseError>> {
    parser::Parser::new(lexer::Tokenizer::new(source)).parse_program()
}
