use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

#[derive(Default)]
struct EnvironmentCore {
    store: HashMap<Rc<str>, Rc<Object>>,
    outer: Option<Environment>,
}

/// Shared handle to one scope of the scope chain.
///
/// Cloning the handle does not copy the scope: closures keep a clone of the
/// handle of the scope they were defined in and see later changes to it.
#[derive(Clone, Default)]
pub struct Environment {
    environment: Rc<RefCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: &Environment) -> Environment {
        tracing::trace!("entering enclosed environment");
        Environment {
            environment: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Looks `key` up in this scope, then in each enclosing one.
    pub fn get(&self, key: &str) -> Option<Rc<Object>> {
        let env = self.environment.borrow();
        match env.store.get(key) {
            Some(value) => Some(value.clone()),
            None => env.outer.as_ref().and_then(|outer| outer.get(key)),
        }
    }

    /// Binds `key` in this scope, shadowing any binding of an outer scope.
    pub fn set(&mut self, key: Rc<str>, value: Rc<Object>) {
        self.environment.borrow_mut().store.insert(key, value);
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.environment, &other.environment)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env = self.environment.borrow();
        let mut names = env.store.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("enclosed", &env.outer.is_some())
            .finish()
    }
}
