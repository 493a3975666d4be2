//! Lexical scopes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::{EvalError, Value};

pub type ScopeRef = Rc<RefCell<Scope>>;

/// A mapping from names to values, chained to an optional enclosing scope.
#[derive(Default)]
pub struct Scope {
    parent: Option<ScopeRef>,
    bindings: IndexMap<String, Value>,
}

impl Scope {
    /// Creates a scope without a parent.
    pub fn new() -> ScopeRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_parent(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            parent: Some(Rc::clone(parent)),
            bindings: IndexMap::new(),
        }))
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }

    /// Binds `name` in this scope, shadowing any outer binding and replacing any local one.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Returns the value bound to `name` in this scope only.
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bindings of this scope only, in definition order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Drops every binding of this scope.
    /// Needed when the host stores a value that keeps this scope alive, such as a native
    /// function capturing it, since the two then own each other.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Looks `name` up from `scope` outwards.
    /// A function bound in the scope it was declared in comes out holding that scope alive.
    pub fn get(scope: &ScopeRef, name: &str) -> Result<Value, EvalError> {
        let mut current = Rc::clone(scope);
        loop {
            let parent = {
                let scope = current.borrow();
                if let Some(value) = scope.bindings.get(name) {
                    return Ok(value.to_strong());
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(EvalError::reference(name)),
            }
        }
    }

    /// Rebinds `name` in the innermost scope that already binds it.
    pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> Result<(), EvalError> {
        let mut current = Rc::clone(scope);
        loop {
            let parent = {
                let mut scope = current.borrow_mut();
                if let Some(slot) = scope.bindings.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(EvalError::reference(name)),
            }
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
