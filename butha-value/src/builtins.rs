use std::rc::Rc;

use indexmap::IndexMap;

use crate::object::NativeFn;
use crate::scope::{Scope, ScopeRef};
use crate::{EvalError, Value};

/// Values the host pre-registers into the root scope of a program.
#[derive(Debug, Default, Clone)]
pub struct BuiltinVars {
    pub values: IndexMap<String, Value>,
}

impl BuiltinVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_native_fn(
        &mut self,
        ident: &str,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
        arity: usize,
    ) {
        let native = NativeFn {
            ident: ident.to_string(),
            arity,
            func: Box::new(func),
        };
        self.values
            .insert(ident.to_string(), Value::NativeFn(Rc::new(native)));
    }

    pub fn add_value(&mut self, ident: &str, value: Value) {
        self.values.insert(ident.to_string(), value);
    }

    /// Defines every builtin in `scope`.
    pub fn install(&self, scope: &ScopeRef) {
        let mut scope = scope.borrow_mut();
        for (ident, value) in &self.values {
            scope.define(ident.clone(), value.clone());
        }
    }

    /// Creates a fresh root scope holding the builtins.
    pub fn root_scope(&self) -> ScopeRef {
        let scope = Scope::new();
        self.install(&scope);
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_scope() {
        let mut builtins = BuiltinVars::new();
        builtins.add_native_fn("one", |_| Ok(Value::Number(1.0)), 0);
        builtins.add_value("answer", Value::Number(42.0));

        let scope = builtins.root_scope();
        assert_eq!(Scope::get(&scope, "answer").unwrap(), Value::Number(42.0));
        match Scope::get(&scope, "one").unwrap() {
            Value::NativeFn(native) => {
                assert_eq!(native.ident, "one");
                assert_eq!(native.call(&[]).unwrap(), Value::Number(1.0));
            }
            other => panic!("expected a native function, got {:?}", other),
        }
    }

    #[test]
    fn test_root_scopes_are_independent() {
        let builtins = BuiltinVars::new();
        let a = builtins.root_scope();
        let b = builtins.root_scope();
        a.borrow_mut().define("x", Value::Bool(true));
        assert!(b.borrow().get_local("x").is_none());
    }
}
