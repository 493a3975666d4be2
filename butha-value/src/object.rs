use std::cell::RefCell;
use std::fmt;
use std::ptr;
use std::rc::{Rc, Weak};

use butha_parser::ast::Node;

use crate::scope::{Scope, ScopeRef};
use crate::{EvalError, Value};

/// A user function: created by evaluating a `function` declaration.
pub struct Function {
    pub ident: String,
    pub params: Rc<[String]>,
    pub body: Rc<Node>,
    closure: Closure,
}

/// Link from a function to the scope its declaration was evaluated in.
enum Closure {
    Strong(ScopeRef),
    /// Used for the binding of the function inside that very scope,
    /// which would otherwise own itself.
    Weak(Weak<RefCell<Scope>>),
}

impl Function {
    pub fn new(ident: String, params: Rc<[String]>, body: Rc<Node>, closure: &ScopeRef) -> Self {
        Self {
            ident,
            params,
            body,
            closure: Closure::Strong(Rc::clone(closure)),
        }
    }

    /// The scope the declaration was evaluated in, or `None` if it has been dropped.
    pub fn closure(&self) -> Option<ScopeRef> {
        match &self.closure {
            Closure::Strong(scope) => Some(Rc::clone(scope)),
            Closure::Weak(scope) => scope.upgrade(),
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self.closure, Closure::Weak(_))
    }

    /// The same function, without keeping its scope alive.
    pub fn downgrade(&self) -> Self {
        let closure = match &self.closure {
            Closure::Strong(scope) => Rc::downgrade(scope),
            Closure::Weak(scope) => scope.clone(),
        };
        Self {
            ident: self.ident.clone(),
            params: Rc::clone(&self.params),
            body: Rc::clone(&self.body),
            closure: Closure::Weak(closure),
        }
    }

    /// The same function, keeping its scope alive. `None` if the scope has been dropped.
    pub fn upgrade(&self) -> Option<Self> {
        Some(Self {
            ident: self.ident.clone(),
            params: Rc::clone(&self.params),
            body: Rc::clone(&self.body),
            closure: Closure::Strong(self.closure()?),
        })
    }

    /// Whether both come from the same declaration evaluated in the same scope.
    pub fn same_as(&self, other: &Function) -> bool {
        let scope_ptr = |closure: &Closure| match closure {
            Closure::Strong(scope) => Rc::as_ptr(scope),
            Closure::Weak(scope) => scope.as_ptr(),
        };
        Rc::ptr_eq(&self.body, &other.body)
            && ptr::eq(scope_ptr(&self.closure), scope_ptr(&other.closure))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The closure scope may contain this very function.
        f.debug_struct("Function")
            .field("ident", &self.ident)
            .field("params", &self.params)
            .field("weak", &self.is_weak())
            .finish()
    }
}

pub type NativeFnPtr = dyn Fn(&[Value]) -> Result<Value, EvalError>;

/// A function implemented by the host.
pub struct NativeFn {
    pub ident: String,
    /// Number of arguments the function reads. Missing arguments are filled with [`Value::Absent`].
    pub arity: usize,
    pub func: Box<NativeFnPtr>,
}

impl NativeFn {
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() >= self.arity {
            return (self.func)(args);
        }
        let mut padded = args.to_vec();
        padded.resize(self.arity, Value::Absent);
        (self.func)(&padded)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("ident", &self.ident)
            .field("arity", &self.arity)
            .finish()
    }
}
