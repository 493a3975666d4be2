//! The Butha interpreter: runs source text through the tokenizer, parser, optimizer and evaluator.

pub mod builtin_functions;
pub mod repl;

use std::{io, thread};

use butha_eval::{Evaluator, DEFAULT_MAX_CALL_DEPTH};
use butha_parser::{parse, tokenize, ParseError};
use butha_passes::optimize;
use butha_source::{Source, Span};
use butha_value::{BuiltinVars, EvalError, ScopeRef, Value};
use thiserror::Error;

pub use repl::Repl;

/// Nested calls a program may make when running on a [`DEEP_STACK_SIZE`] stack.
pub const DEEP_MAX_CALL_DEPTH: usize = 10_000;

/// Stack size of the thread started by [`run_deep`].
/// Evaluation recurses on the host stack a few frames per call.
pub const DEEP_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Settings of an [`Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Run the optimizer between parsing and evaluation.
    pub optimize: bool,
    /// Maximum number of nested user function calls.
    pub max_call_depth: usize,
}

impl Options {
    /// Options for an interpreter running inside [`run_deep`].
    pub fn deep() -> Self {
        Self {
            max_call_depth: DEEP_MAX_CALL_DEPTH,
            ..Self::default()
        }
    }
}

/// Sized for the stack of any thread. Use [`Options::deep`] with [`run_deep`] for deep recursion.
impl Default for Options {
    fn default() -> Self {
        Self {
            optimize: true,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Runs `f` on a new thread with a [`DEEP_STACK_SIZE`] stack and returns its result.
pub fn run_deep<T, F>(f: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name("butha".to_string())
        .stack_size(DEEP_STACK_SIZE)
        .spawn(f)?
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "interpreter thread panicked"))
}

/// Any error raised while running a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Parse(ParseError::Lex(_)) => "LexError",
            Error::Parse(ParseError::Syntax(_)) => "SyntaxError",
            Error::Eval(err) => err.kind_name(),
        }
    }

    /// Location of the error in the source. Evaluation errors carry none.
    pub fn span(&self) -> Option<&Span> {
        match self {
            Error::Parse(err) => Some(err.span()),
            Error::Eval(_) => None,
        }
    }

    /// Renders the error as a diagnostic against the `source` it was raised for.
    pub fn render(&self, source: &Source) -> String {
        source.report(format!("{}: {}", self.kind_name(), self), self.span())
    }
}

/// Runs programs against a persistent root scope.
///
/// Bindings made by one call to [`Interpreter::eval_source`] stay visible to the next one.
pub struct Interpreter {
    options: Options,
    evaluator: Evaluator,
    scope: ScopeRef,
}

impl Interpreter {
    /// Creates an interpreter with the default built-ins.
    pub fn new(options: Options) -> Self {
        Self::with_builtins(options, &builtin_functions::default_builtin_vars())
    }

    pub fn with_builtins(options: Options, builtin_vars: &BuiltinVars) -> Self {
        Self {
            options,
            evaluator: Evaluator::with_max_call_depth(options.max_call_depth),
            scope: builtin_vars.root_scope(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The root scope holding built-ins and top-level declarations.
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Tokenizes, parses, optionally optimizes and evaluates `source`.
    pub fn eval_source(&mut self, source: &str) -> Result<Value, Error> {
        let tokens = tokenize(source);
        log::debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());

        let ast = parse(tokens)?;
        let ast = if self.options.optimize {
            optimize(&ast)
        } else {
            ast
        };

        Ok(self.evaluator.evaluate(&ast, &self.scope)?)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Runs `source` in a fresh [`Interpreter`] with default options.
/// A returned function keeps the root scope, and the declarations in it, alive.
pub fn interpret(source: &str) -> Result<Value, Error> {
    Interpreter::default().eval_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use butha_value::Scope;

    #[test]
    fn test_error_kind_names() {
        assert_eq!(interpret("1 $ 2").unwrap_err().kind_name(), "LexError");
        assert_eq!(interpret(r#""open"#).unwrap_err().kind_name(), "LexError");
        assert_eq!(interpret("if 1 2").unwrap_err().kind_name(), "SyntaxError");
        assert_eq!(interpret("nope").unwrap_err().kind_name(), "ReferenceError");
        assert_eq!(interpret("call 1()").unwrap_err().kind_name(), "RuntimeError");
    }

    #[test]
    fn test_render_syntax_error() {
        console::set_colors_enabled(false);
        let content = "if 1 x";
        let err = interpret(content).unwrap_err();
        assert_eq!(
            err.render(&Source::named("test.bu", content)),
            "error: SyntaxError: expected `then`, found `x`\n \
             --> test.bu:1:6\n  |\n1 | if 1 x\n  |      ^\n"
        );
    }

    #[test]
    fn test_render_eval_error() {
        console::set_colors_enabled(false);
        let content = "x + 1";
        let err = interpret(content).unwrap_err();
        assert_eq!(
            err.render(&Source::new(content)),
            "error: ReferenceError: `x` is not defined\n"
        );
    }

    #[test]
    fn test_bindings_persist() {
        let mut interpreter = Interpreter::default();
        interpreter.eval_source("function double(x) x * 2").unwrap();
        assert_eq!(
            interpreter.eval_source("double(21)").unwrap(),
            Value::Number(42.0)
        );
        assert!(matches!(
            Scope::get(interpreter.scope(), "double"),
            Ok(Value::Function(_))
        ));
    }

    #[test]
    fn test_recovers_after_error() {
        let mut interpreter = Interpreter::default();
        assert!(interpreter.eval_source("missing()").is_err());
        assert_eq!(interpreter.eval_source("1 + 1").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_returned_function_keeps_globals() {
        let f = interpret("function f(n) if n then f(n - 1) else 42").unwrap();
        assert_eq!(
            Evaluator::new().call(f, &[Value::Number(3.0)]),
            Ok(Value::Number(42.0))
        );
    }

    #[test]
    fn test_root_scope_freed_with_interpreter() {
        let mut interpreter = Interpreter::default();
        interpreter
            .eval_source("function f(n) if n then f(n - 1) else 0  f(3)")
            .unwrap();
        let root = Rc::downgrade(interpreter.scope());
        drop(interpreter);
        assert!(root.upgrade().is_none());
    }

    #[test]
    fn test_deep_recursion() {
        let sum = run_deep(|| {
            let mut interpreter = Interpreter::new(Options::deep());
            interpreter
                .eval_source("function sum(n) if n then n + sum(n - 1) else 0  sum(5000)")
                .map(|value| value.to_string())
                .map_err(|err| err.to_string())
        })
        .unwrap();
        assert_eq!(sum, Ok("12502500".to_string()));
    }

    #[test]
    fn test_custom_builtins() {
        let mut builtin_vars = BuiltinVars::new();
        builtin_vars.add_value("answer", Value::Number(42.0));
        let mut interpreter = Interpreter::with_builtins(Options::default(), &builtin_vars);
        assert_eq!(interpreter.eval_source("answer").unwrap(), Value::Number(42.0));
        assert!(interpreter.eval_source("print(1)").is_err());
    }
}
