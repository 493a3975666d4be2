use butha_source::Source;
use butha_value::Value;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::{Interpreter, Options};

const PROMPT: &str = "> ";

/// Interactive read-eval-print loop. Declarations persist from one line to the next.
pub struct Repl {
    interpreter: Interpreter,
}

impl Repl {
    pub fn new(options: Options) -> Self {
        Self {
            interpreter: Interpreter::new(options),
        }
    }

    /// Reads lines until `:quit`, `:exit`, end of input or interrupt.
    pub fn run(&mut self) -> Result<(), ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed)?;
                    match self.interpreter.eval_source(trimmed) {
                        Ok(Value::Absent) => {}
                        Ok(value) => println!("{:?}", value),
                        Err(err) => eprint!("{}", err.render(&Source::named("<repl>", trimmed))),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}
