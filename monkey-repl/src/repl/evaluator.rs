use std::rc::Rc;

use monkey_eval::{eval_program, Environment, EvaluationError, Object};
use monkey_syntax::ast::Program;

/// Evaluates one program after another in the same environment, so later
/// inputs see the bindings of earlier ones.
#[derive(Default)]
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, program: &Program) -> Result<Rc<Object>, EvaluationError> {
        eval_program(program, &mut self.environment)
    }
}
