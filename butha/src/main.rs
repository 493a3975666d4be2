use std::path::PathBuf;
use std::process::ExitCode;
use std::fs;

use butha::{run_deep, Interpreter, Options, Repl, DEEP_MAX_CALL_DEPTH};
use butha_parser::printer::Printer;
use butha_parser::{parse_str, tokenize};
use butha_passes::optimize;
use butha_source::Source;
use butha_value::Value;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Butha language interpreter")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Butha script file
    Run {
        script: PathBuf,
        /// Evaluate the tree as parsed, without constant folding
        #[arg(long)]
        no_optimize: bool,
        /// Maximum number of nested function calls
        #[arg(long, default_value_t = DEEP_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Evaluate a snippet of Butha code and print its value
    Eval { source: String },
    /// Print the tokens of a snippet
    Tokens { source: String },
    /// Print the syntax tree of a snippet
    Ast {
        source: String,
        /// Print the tree after optimization
        #[arg(long)]
        optimize: bool,
    },
    /// Start an interactive REPL session
    Repl,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    // evaluation recurses on the host stack
    match run_deep(move || execute(args.command.unwrap_or(Command::Repl))) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Command) -> ExitCode {
    match command {
        Command::Run {
            script,
            no_optimize,
            max_call_depth,
        } => {
            let options = Options {
                optimize: !no_optimize,
                max_call_depth,
            };
            run_script(script, options)
        }
        Command::Eval { source } => {
            let mut interpreter = Interpreter::new(Options::deep());
            match interpreter.eval_source(&source) {
                Ok(Value::Absent) => ExitCode::SUCCESS,
                Ok(value) => {
                    println!("{:?}", value);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprint!("{}", err.render(&Source::named("<eval>", &source)));
                    ExitCode::FAILURE
                }
            }
        }
        Command::Tokens { source } => {
            for token in tokenize(&source) {
                let position = Source::new(&source).position(token.position());
                println!("{:>6}  {}", position.to_string(), token);
            }
            ExitCode::SUCCESS
        }
        Command::Ast { source, optimize: optimized } => match parse_str(&source) {
            Ok(ast) => {
                let ast = if optimized { optimize(&ast) } else { ast };
                let printer = Printer::new().colored(console::colors_enabled());
                print!("{}", printer.print(&ast));
                ExitCode::SUCCESS
            }
            Err(err) => {
                let err = butha::Error::from(err);
                eprint!("{}", err.render(&Source::named("<ast>", &source)));
                ExitCode::FAILURE
            }
        },
        Command::Repl => match Repl::new(Options::deep()).run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_script(script: PathBuf, options: Options) -> ExitCode {
    let content = match fs::read_to_string(&script) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", script.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let name = script.display().to_string();
    let mut interpreter = Interpreter::new(options);
    match interpreter.eval_source(&content) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", err.render(&Source::named(&name, &content)));
            ExitCode::FAILURE
        }
    }
}
