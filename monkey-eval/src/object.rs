use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use monkey_syntax::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Vec<Rc<Object>>),
    Hash(HashMap<HashKey, (Rc<Object>, Rc<Object>)>),
    Function(Function),
    BuiltinFunction(BuiltinFunction),
    Null,
}

// `true`, `false` and `null` exist once per thread so that `==` on them can
// compare pointers.
thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn string(value: impl Into<Rc<str>>) -> Rc<Object> {
        Rc::new(Object::String(value.into()))
    }
    pub fn array(array: Vec<Rc<Object>>) -> Rc<Object> {
        Rc::new(Object::Array(array))
    }
    pub fn hash(hash: HashMap<HashKey, (Rc<Object>, Rc<Object>)>) -> Rc<Object> {
        Rc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Rc<[ast::Identifier]>,
        body: Rc<ast::BlockStatement>,
        env: Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin_function(func: BuiltinFunction) -> Rc<Object> {
        Rc::new(Object::BuiltinFunction(func))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::BuiltinFunction(_) => "BUILTIN",
            Object::Null => "NULL",
        }
    }

    /// `null` and `false` are falsy, every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                write!(f, "fn(")?;
                for (i, parameter) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ") {}", function.body)
            }
            Object::BuiltinFunction(function) => write!(f, "builtin function {}", function.name),
        }
    }
}

/// Value-based key of a hash: two strings with the same text are the same
/// key even when they are different objects.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
}

pub fn object_to_key(object: &Rc<Object>) -> Result<HashKey, EvaluationError> {
    match object.as_ref() {
        Object::Integer(value) => Ok(HashKey::Integer(*value)),
        Object::Boolean(value) => Ok(HashKey::Boolean(*value)),
        Object::String(value) => Ok(HashKey::String(value.clone())),
        _ => Err(EvaluationError::UnusableAsHashKey(object.type_name())),
    }
}

/// A user function together with the environment it was defined in.
#[derive(Clone)]
pub struct Function {
    pub parameters: Rc<[ast::Identifier]>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

pub type BuiltinFn = fn(Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError>;

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Everything that cuts evaluation of a statement list short.
///
/// `Return` travels up to the closest function call (or the program), `Error`
/// all the way out of `eval_program`.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Rc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(error: EvaluationError) -> Self {
        QuickReturn::Error(error)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("unknown operator: {operation}{right}")]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operation} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("type mismatch: {left} {operation} {right}")]
    TypeMismatch {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("not a function: {0}")]
    CallNonFunction(&'static str),
    #[error("wrong number of arguments: want={expected}, got={actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow: {0}")]
    IntegerOverflow(Rc<str>),
    #[error("wrong number of arguments. got={got}, want={want}")]
    BuiltinArgumentCount { got: usize, want: usize },
    #[error("argument to '{function}' not supported, got {got}")]
    UnsupportedArgument {
        function: &'static str,
        got: &'static str,
    },
    #[error("argument to '{function}' must be ARRAY, got {got}")]
    ExpectedArray {
        function: &'static str,
        got: &'static str,
    },
}

impl EvaluationError {
    /// How the error is shown to a user, e.g. `ERROR: division by zero`.
    pub fn inspect(&self) -> String {
        format!("ERROR: {}", self)
    }
}
