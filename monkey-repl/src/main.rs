mod error;
mod repl;
mod runner;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// What to show besides the result of each input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub tokens: bool,
    pub ast: bool,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to run; starts the REPL when omitted
    path: Option<PathBuf>,
    /// Print the tokens of every input
    #[arg(long)]
    tokens: bool,
    /// Print the parsed program before evaluating it
    #[arg(long)]
    ast: bool,
}

/// Logs go to stderr and only when `RUST_LOG` is set, e.g.
/// `RUST_LOG=monkey_eval=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let options = Options {
        tokens: cli.tokens,
        ast: cli.ast,
    };

    let result = match cli.path {
        None => repl::start(options),
        Some(path) => runner::execute_file(&path, options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
