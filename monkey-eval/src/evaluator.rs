use std::collections::HashMap;
use std::rc::Rc;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, Function, Object, QuickReturn};
use monkey_syntax::ast;
use monkey_syntax::ast::{Expression, InfixOperationKind, PrefixOperationKind};

/// Evaluates `program` in `environment`, which keeps every binding made by
/// the program so it can be reused for the next one.
///
/// The result is the value of the last statement, or the value of the first
/// top-level `return`.
pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Rc<Object>, EvaluationError> {
    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => {
                tracing::debug!(%error, "evaluation failed");
                return Err(error);
            }
            Ok(object) => output = object,
        };
    }
    Ok(output)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => {
            let value = eval_expression(&statement.value, environment)?;
            Err(QuickReturn::Return(value))
        }
        ast::Statement::Let(statement) => {
            let value = eval_expression(&statement.value, environment)?;
            environment.set(statement.identifier.name.clone(), value);
            Ok(Object::null())
        }
    }
}

/// Unlike `eval_program`, a block hands a `return` on untouched so that it
/// reaches the enclosing function call.
fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::ArrayLiteral(array) => {
            Ok(Object::array(eval_expressions(array, environment)?))
        }
        Expression::HashLiteral(literal) => {
            let mut hashmap = HashMap::new();
            for (key, value) in literal {
                let key = eval_expression(key, environment)?;
                let hashed_key = object_to_key(&key)?;
                let value = eval_expression(value, environment)?;
                hashmap.insert(hashed_key, (key, value));
            }
            Ok(Object::hash(hashmap))
        }
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .or_else(|| builtins::lookup(&identifier.name).map(Object::builtin_function))
            .ok_or_else(|| {
                EvaluationError::UnknownIdentifier(identifier.name.clone()).into()
            }),
        Expression::PrefixOperation(kind, expression) => {
            let right = eval_expression(expression, environment)?;
            Ok(eval_prefix_operation(*kind, right)?)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_infix_operation(*kind, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            Ok(apply_function(&function, arguments)?)
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            Ok(eval_index_expression(&left, &index)?)
        }
    }
}

fn eval_expressions(
    expressions: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment)?);
    }
    Ok(result)
}

fn apply_function(
    function: &Rc<Object>,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, EvaluationError> {
    match function.as_ref() {
        Object::Function(function) => call_function(function, arguments),
        Object::BuiltinFunction(builtin) => {
            tracing::trace!(name = builtin.name, arguments = arguments.len(), "calling builtin");
            (builtin.func)(arguments)
        }
        other => Err(EvaluationError::CallNonFunction(other.type_name())),
    }
}

/// Runs the body in a fresh scope enclosing the scope the function was
/// defined in. This is where a `return` inside the body stops.
fn call_function(
    function: &Function,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, EvaluationError> {
    if function.parameters.len() != arguments.len() {
        return Err(EvaluationError::WrongArgumentCount {
            expected: function.parameters.len(),
            actual: arguments.len(),
        });
    }
    tracing::trace!(arguments = arguments.len(), "calling function");

    let mut new_environment = Environment::new_enclosed(&function.env);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        new_environment.set(parameter.name.clone(), argument);
    }
    match eval_block_statement(&function.body, &mut new_environment) {
        Ok(object) => Ok(object),
        Err(QuickReturn::Return(value)) => Ok(value),
        Err(QuickReturn::Error(err)) => Err(err),
    }
}

fn eval_index_expression(
    left: &Rc<Object>,
    index: &Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(hash), _) => {
            let hashed_index = object_to_key(index)?;
            Ok(hash
                .get(&hashed_index)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => Err(EvaluationError::IndexNotSupported(left.type_name())),
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (kind, right.as_ref()) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => value
            .checked_neg()
            .map(Object::integer)
            .ok_or_else(|| EvaluationError::IntegerOverflow(format!("-({})", value).into())),
        (PrefixOperationKind::Minus, _) => Err(EvaluationError::UnknownPrefixOperator {
            operation: kind,
            right: right.type_name(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::String(left), Object::String(right)) => match kind {
            InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", left, right))),
            _ => Err(EvaluationError::UnknownInfixOperator {
                left: "STRING",
                operation: kind,
                right: "STRING",
            }),
        },
        // booleans and null are singletons, so identity is equality for them
        _ if kind == InfixOperationKind::Equal => Ok(Object::boolean(Rc::ptr_eq(&left, &right))),
        _ if kind == InfixOperationKind::NotEqual => {
            Ok(Object::boolean(!Rc::ptr_eq(&left, &right)))
        }
        _ if left.type_name() != right.type_name() => Err(EvaluationError::TypeMismatch {
            left: left.type_name(),
            operation: kind,
            right: right.type_name(),
        }),
        _ => Err(EvaluationError::UnknownInfixOperator {
            left: left.type_name(),
            operation: kind,
            right: right.type_name(),
        }),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Rc<Object>, EvaluationError> {
    let checked = match kind {
        InfixOperationKind::Plus => left.checked_add(right),
        InfixOperationKind::Minus => left.checked_sub(right),
        InfixOperationKind::Multiply => left.checked_mul(right),
        InfixOperationKind::Divide if right == 0 => return Err(EvaluationError::DivisionByZero),
        InfixOperationKind::Divide => left.checked_div(right),
        InfixOperationKind::LessThan => return Ok(Object::boolean(left < right)),
        InfixOperationKind::GreaterThan => return Ok(Object::boolean(left > right)),
        InfixOperationKind::Equal => return Ok(Object::boolean(left == right)),
        InfixOperationKind::NotEqual => return Ok(Object::boolean(left != right)),
    };
    checked.map(Object::integer).ok_or_else(|| {
        EvaluationError::IntegerOverflow(format!("{} {} {}", left, kind, right).into())
    })
}
