use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use butha_value::{BuiltinVars, EvalError, Value};

/// Returns the default [`BuiltinVars`] that should be used.
pub fn default_builtin_vars() -> BuiltinVars {
    let mut builtin_vars = BuiltinVars::new();
    builtin_vars.add_native_fn("print", print, 1);
    builtin_vars.add_native_fn("println", println, 1);
    builtin_vars.add_native_fn("assert_eq", assert_eq, 2);
    builtin_vars.add_native_fn("assert", assert, 1);
    builtin_vars.add_native_fn("clock", clock, 0);
    builtin_vars.add_native_fn("typeof", type_of, 1);
    builtin_vars
}

fn join(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes its arguments separated by spaces.
pub fn print(args: &[Value]) -> Result<Value, EvalError> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", join(args))
        .and_then(|_| stdout.flush())
        .map_err(|err| EvalError::runtime(format!("print failed: {}", err)))?;
    Ok(Value::Absent)
}

pub fn println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", join(args));
    Ok(Value::Absent)
}

pub fn assert(args: &[Value]) -> Result<Value, EvalError> {
    let arg = &args[0];
    if arg.is_truthy() {
        Ok(Value::Absent)
    } else {
        Err(EvalError::runtime(format!("assertion failed: {:?} is falsy", arg)))
    }
}

pub fn assert_eq(args: &[Value]) -> Result<Value, EvalError> {
    let left = &args[0];
    let right = &args[1];

    if left == right {
        Ok(Value::Absent)
    } else {
        Err(EvalError::runtime(format!(
            "assertion failed: {:?} != {:?}",
            left, right
        )))
    }
}

/// Seconds since the Unix epoch.
pub fn clock(_args: &[Value]) -> Result<Value, EvalError> {
    let since_the_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| EvalError::runtime("system clock is before the Unix epoch"))?;
    Ok(Value::Number(since_the_epoch.as_secs_f64()))
}

pub fn type_of(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::string(args[0].type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert() {
        assert_eq!(assert(&[Value::Number(1.0)]), Ok(Value::Absent));
        assert_eq!(
            assert(&[Value::Number(0.0)]),
            Err(EvalError::runtime("assertion failed: 0 is falsy"))
        );
    }

    #[test]
    fn test_assert_eq() {
        assert_eq!(
            assert_eq(&[Value::string("a"), Value::string("a")]),
            Ok(Value::Absent)
        );
        assert_eq!(
            assert_eq(&[Value::string("a"), Value::Number(1.0)]),
            Err(EvalError::runtime(r#"assertion failed: "a" != 1"#))
        );
    }

    #[test]
    fn test_type_of() {
        assert_eq!(type_of(&[Value::Bool(true)]), Ok(Value::string("boolean")));
        assert_eq!(type_of(&[Value::Absent]), Ok(Value::string("undefined")));
    }

    #[test]
    fn test_clock_is_positive() {
        match clock(&[]).unwrap() {
            Value::Number(secs) => assert!(secs > 0.0),
            other => panic!("expected a number, got {:?}", other),
        }
    }

    #[test]
    fn test_builtins_pad_missing_args() {
        let builtin_vars = default_builtin_vars();
        match &builtin_vars.values["typeof"] {
            Value::NativeFn(native) => {
                assert_eq!(native.call(&[]).unwrap(), Value::string("undefined"))
            }
            other => panic!("expected a native function, got {:?}", other),
        }
    }
}
