use std::rc::Rc;

use crate::object::{BuiltinFn, BuiltinFunction, EvaluationError, Object};

fn check_argument_count(args: &[Rc<Object>], want: usize) -> Result<(), EvaluationError> {
    if args.len() != want {
        return Err(EvaluationError::BuiltinArgumentCount {
            got: args.len(),
            want,
        });
    }
    Ok(())
}

/// Extracts the single array argument of `function`.
fn array_argument<'a>(
    function: &'static str,
    args: &'a [Rc<Object>],
) -> Result<&'a [Rc<Object>], EvaluationError> {
    check_argument_count(args, 1)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(arr),
        other => Err(EvaluationError::ExpectedArray {
            function,
            got: other.type_name(),
        }),
    }
}

fn builtin_len(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    check_argument_count(&args, 1)?;
    match args[0].as_ref() {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(EvaluationError::UnsupportedArgument {
            function: "len",
            got: other.type_name(),
        }),
    }
}

fn builtin_first(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    let arr = array_argument("first", &args)?;
    Ok(arr.first().cloned().unwrap_or_else(Object::null))
}

fn builtin_last(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    let arr = array_argument("last", &args)?;
    Ok(arr.last().cloned().unwrap_or_else(Object::null))
}

fn builtin_rest(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    let arr = array_argument("rest", &args)?;
    if arr.is_empty() {
        return Ok(Object::null());
    }
    Ok(Object::array(arr[1..].to_vec()))
}

fn builtin_push(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    check_argument_count(&args, 2)?;
    match args[0].as_ref() {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(EvaluationError::ExpectedArray {
            function: "push",
            got: other.type_name(),
        }),
    }
}

fn builtin_puts(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    for arg in &args {
        println!("{}", arg);
    }
    Ok(Object::null())
}

const BUILTINS: [(&str, BuiltinFn); 6] = [
    ("len", builtin_len),
    ("first", builtin_first),
    ("last", builtin_last),
    ("rest", builtin_rest),
    ("push", builtin_push),
    ("puts", builtin_puts),
];

/// The fixed set of native functions, consulted when a name is not bound in
/// any enclosing environment.
pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|&(name, func)| BuiltinFunction { name, func })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Rc<Object> {
        Object::array(values.iter().map(|&value| Object::string(value)).collect())
    }

    #[test]
    fn test_len() {
        assert_eq!(
            builtin_len(vec![]),
            Err(EvaluationError::BuiltinArgumentCount { got: 0, want: 1 })
        );
        assert_eq!(
            builtin_len(vec![Object::string("hello"), Object::string("world")])
                .unwrap_err()
                .to_string(),
            "wrong number of arguments. got=2, want=1"
        );
        assert_eq!(builtin_len(vec![Object::array(vec![])]), Ok(Object::integer(0)));
        assert_eq!(
            builtin_len(vec![strings(&["hello", "world"])]),
            Ok(Object::integer(2))
        );
        assert_eq!(builtin_len(vec![Object::string("hello")]), Ok(Object::integer(5)));
        assert_eq!(builtin_len(vec![Object::string("héllo")]), Ok(Object::integer(5)));
        assert_eq!(
            builtin_len(vec![Object::integer(42)])
                .unwrap_err()
                .to_string(),
            "argument to 'len' not supported, got INTEGER"
        );
    }

    #[test]
    fn test_first_last_rest() {
        let arr = strings(&["a", "b", "c"]);
        assert_eq!(builtin_first(vec![arr.clone()]), Ok(Object::string("a")));
        assert_eq!(builtin_last(vec![arr.clone()]), Ok(Object::string("c")));
        assert_eq!(builtin_rest(vec![arr]), Ok(strings(&["b", "c"])));

        let empty = Object::array(vec![]);
        assert_eq!(builtin_first(vec![empty.clone()]), Ok(Object::null()));
        assert_eq!(builtin_last(vec![empty.clone()]), Ok(Object::null()));
        assert_eq!(builtin_rest(vec![empty]), Ok(Object::null()));

        assert_eq!(
            builtin_first(vec![Object::integer(1)])
                .unwrap_err()
                .to_string(),
            "argument to 'first' must be ARRAY, got INTEGER"
        );
    }

    #[test]
    fn test_push_does_not_mutate_its_argument() {
        let arr = strings(&["a"]);
        let pushed = builtin_push(vec![arr.clone(), Object::integer(2)]);

        assert_eq!(
            pushed,
            Ok(Object::array(vec![Object::string("a"), Object::integer(2)]))
        );
        assert_eq!(arr, strings(&["a"]));
        assert_eq!(
            builtin_push(vec![arr]),
            Err(EvaluationError::BuiltinArgumentCount { got: 1, want: 2 })
        );
    }

    #[test]
    fn test_lookup() {
        for (name, _) in BUILTINS {
            assert_eq!(lookup(name).map(|builtin| builtin.name), Some(name));
        }
        assert!(lookup("map").is_none());
    }
}
