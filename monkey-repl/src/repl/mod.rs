mod evaluator;
mod printer;
mod reader;

use rustyline::DefaultEditor;

use monkey_syntax::lexer::Tokenizer;
use monkey_syntax::parser::Parser;

use crate::error::CliError;
use crate::Options;
use evaluator::InterpreterEvaluator;
use printer::{Printer, StdoutPrinter};
use reader::{ReadOutput, Reader};

struct Repl<P: Printer> {
    evaluator: InterpreterEvaluator,
    printer: P,
    options: Options,
}

impl<P: Printer> Repl<P> {
    fn new(printer: P, options: Options) -> Self {
        Self {
            evaluator: InterpreterEvaluator::new(),
            printer,
            options,
        }
    }

    fn run(mut self, mut reader: Reader) -> Result<(), CliError> {
        loop {
            match reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Line(line) => self.handle_line(&line),
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        if self.options.tokens {
            for token in Tokenizer::new(line) {
                self.printer
                    .print_line(&format!("{}..{} {:?}", token.start, token.end, token.kind));
            }
        }

        let program = match Parser::new(Tokenizer::new(line)).parse_program() {
            Ok(program) => program,
            Err(errors) => {
                for err in errors {
                    self.printer.print_line(&format!("\t{}", err));
                }
                return;
            }
        };

        if program.statements.is_empty() {
            return;
        }

        if self.options.ast {
            self.printer.print_line(&program.to_string());
        }

        match self.evaluator.evaluate(&program) {
            Ok(result) => self.printer.print_line(&result.to_string()),
            Err(err) => self.printer.print_line(&err.inspect()),
        }
    }
}

pub fn start(options: Options) -> Result<(), CliError> {
    let rl = DefaultEditor::new()?;
    Repl::new(StdoutPrinter {}, options).run(Reader::new(rl))
}
