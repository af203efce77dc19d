//! Tree-walking evaluator for Monkey programs parsed by `monkey-syntax`.

pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod object;

pub use environment::Environment;
pub use evaluator::eval_program;
pub use object::{EvaluationError, Object};
