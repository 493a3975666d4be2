//! Tree-walking evaluator.

use std::rc::Rc;

use butha_parser::ast::{BinaryOp, Node};
use butha_value::{EvalError, Function, Scope, ScopeRef, Value};

/// Default limit of nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

pub type EvalResult = Result<Value, EvalError>;

/// Walks an AST against a chain of scopes.
///
/// An `Evaluator` holds no bindings itself: all state lives in the scopes passed to
/// [`Evaluator::evaluate`], so one evaluator can be reused across programs.
pub struct Evaluator {
    max_call_depth: usize,
    /// Number of user function calls currently executing.
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Self {
            max_call_depth,
            depth: 0,
        }
    }

    /// Evaluates `node` in `scope` and returns its value.
    /// Function declarations bind into `scope`, so bindings are observable after the call.
    pub fn evaluate(&mut self, node: &Node, scope: &ScopeRef) -> EvalResult {
        match node {
            Node::Program(body) => {
                log::debug!("evaluating program with {} statements", body.len());
                let mut result = Value::Absent;
                for stmt in body {
                    result = self.evaluate(stmt, scope)?;
                }
                Ok(result)
            }
            Node::Literal(literal) => Ok(Value::from(literal)),
            Node::Identifier(ident) => Scope::get(scope, ident),
            Node::Binary { .. } => self.evaluate_binary(node, scope),
            Node::Call { callee, args } => {
                let callee = self.evaluate(callee, scope)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(callee, &args)
            }
            Node::FnDeclaration {
                ident,
                params,
                body,
            } => {
                let func = Function::new(ident.clone(), Rc::clone(params), Rc::clone(body), scope);
                // the binding must not keep its own scope alive
                let binding = Value::Function(Rc::new(func.downgrade()));
                scope.borrow_mut().define(ident.clone(), binding);
                Ok(Value::Function(Rc::new(func)))
            }
            Node::If {
                condition,
                consequent,
                alternate,
            } => {
                if self.evaluate(condition, scope)?.is_truthy() {
                    self.evaluate(consequent, scope)
                } else if let Some(alternate) = alternate {
                    self.evaluate(alternate, scope)
                } else {
                    Ok(Value::Absent)
                }
            }
            Node::While { condition, body } => {
                let mut result = Value::Absent;
                while self.evaluate(condition, scope)?.is_truthy() {
                    result = self.evaluate(body, scope)?;
                }
                Ok(result)
            }
            Node::ExprStmt(expr) => self.evaluate(expr, scope),
        }
    }

    /// Evaluates a binary expression, following its left operands with a loop:
    /// `1 + 2 + 3 + ...` nests to the left as deep as it is long.
    fn evaluate_binary(&mut self, node: &Node, scope: &ScopeRef) -> EvalResult {
        let mut spine = Vec::new();
        let mut leftmost = node;
        while let Node::Binary { op, lhs, rhs } = leftmost {
            spine.push((*op, rhs.as_ref()));
            leftmost = lhs;
        }

        let mut result = self.evaluate(leftmost, scope)?;
        for (op, rhs) in spine.into_iter().rev() {
            let rhs = self.evaluate(rhs, scope)?;
            result = binary_op(op, result, rhs)?;
        }
        Ok(result)
    }

    /// Calls `callee` with already evaluated arguments.
    pub fn call(&mut self, callee: Value, args: &[Value]) -> EvalResult {
        match callee {
            Value::Function(func) => self.call_function(&func, args),
            Value::NativeFn(native) => {
                log::trace!("calling native fn {} with {} arguments", native.ident, args.len());
                native.call(args)
            }
            other => Err(EvalError::runtime(format!(
                "cannot call a {} value (`{}`)",
                other.type_name(),
                other
            ))),
        }
    }

    fn call_function(&mut self, func: &Function, args: &[Value]) -> EvalResult {
        if self.depth >= self.max_call_depth {
            return Err(EvalError::runtime(format!(
                "maximum call depth of {} exceeded in `{}`",
                self.max_call_depth, func.ident
            )));
        }
        log::trace!(
            "calling fn {} with {} arguments (depth {})",
            func.ident,
            args.len(),
            self.depth
        );

        let closure = func.closure().ok_or_else(|| {
            EvalError::runtime(format!("`{}` outlived the scope it was declared in", func.ident))
        })?;
        let call_scope = Scope::with_parent(&closure);
        {
            let mut call_scope = call_scope.borrow_mut();
            for (i, param) in func.params.iter().enumerate() {
                // missing arguments are absent, extra arguments are ignored
                let arg = args.get(i).cloned().unwrap_or(Value::Absent);
                call_scope.define(param.clone(), arg);
            }
        }

        self.depth += 1;
        let result = self.evaluate(&func.body, &call_scope);
        self.depth -= 1;
        result
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `op` to two values.
/// `+` concatenates when either side is a string.
/// Otherwise both sides must be numbers (or booleans).
pub fn binary_op(op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult {
    if op == BinaryOp::Add && (lhs.cast_to_str().is_some() || rhs.cast_to_str().is_some()) {
        return Ok(Value::string(format!("{}{}", lhs, rhs)));
    }
    match (lhs.to_number(), rhs.to_number()) {
        (Some(l), Some(r)) => Ok(Value::Number(op.apply(l, r))),
        _ => Err(EvalError::runtime(format!(
            "cannot apply `{}` to {} and {}",
            op,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

/// Evaluates `node` in `scope` with a default [`Evaluator`].
pub fn evaluate(node: &Node, scope: &ScopeRef) -> EvalResult {
    Evaluator::new().evaluate(node, scope)
}
