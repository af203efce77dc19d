use std::path::PathBuf;

use monkey_eval::EvaluationError;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error("found {0} parse error(s)")]
    Parse(usize),
    #[error("{}", .0.inspect())]
    Evaluation(EvaluationError),
}
