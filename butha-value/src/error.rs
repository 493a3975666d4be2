use thiserror::Error;

/// Errors raised while evaluating a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Use or assignment of a name that no enclosing scope defines.
    #[error("`{name}` is not defined")]
    Reference { name: String },
    /// An invalid operation, such as calling a value that is not a function.
    #[error("{message}")]
    Runtime { message: String },
}

impl EvalError {
    pub fn reference(name: impl Into<String>) -> Self {
        EvalError::Reference { name: name.into() }
    }

    pub fn runtime(message: impl ToString) -> Self {
        EvalError::Runtime {
            message: message.to_string(),
        }
    }

    /// Name of the error kind, as shown to users.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EvalError::Reference { .. } => "ReferenceError",
            EvalError::Runtime { .. } => "RuntimeError",
        }
    }
}
