use std::path::Path;

use monkey_eval::{eval_program, Environment, Object};
use monkey_syntax::lexer::Tokenizer;
use monkey_syntax::parser::Parser;

use crate::error::CliError;
use crate::Options;

/// Runs a script once in a fresh environment.
///
/// The value of the last statement is printed unless it is `null`.
pub fn execute_file(path: &Path, options: Options) -> Result<(), CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running script");
    execute(&source, options)
}

fn execute(source: &str, options: Options) -> Result<(), CliError> {
    if options.tokens {
        for token in Tokenizer::new(source) {
            println!("{}..{} {:?}", token.start, token.end, token.kind);
        }
    }

    let program = Parser::new(Tokenizer::new(source))
        .parse_program()
        .map_err(|errors| {
            for err in &errors {
                eprintln!("\t{}", err);
            }
            CliError::Parse(errors.len())
        })?;

    if options.ast {
        println!("{}", program);
    }

    let mut env = Environment::new();
    let result = eval_program(&program, &mut env).map_err(CliError::Evaluation)?;
    if *result != Object::Null {
        println!("{}", result);
    }
    Ok(())
}
