//! Front end of the Butha language: tokenizer, AST and parser.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod visitor;

pub use ast::Node;
pub use lexer::tokenize;
pub use parser::{parse, ParseError};

/// Tokenizes and parses `source` in one step.
pub fn parse_str(source: &str) -> Result<Node, ParseError> {
    parse(tokenize(source))
}
