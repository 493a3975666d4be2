use crate::ast::Node;
use crate::lexer::{Token, TokenKind};
use butha_source::{LexError, Span, SyntaxError};
use std::mem;
use thiserror::Error;

mod expr;
mod stmt;

/// First error encountered while parsing. Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Syntax(err) => err.span(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum number of nested expressions and statement bodies.
/// Parsing and every later stage recurse once per level.
pub const MAX_NESTING: usize = 200;

pub struct Parser {
    /// Cached token for peeking.
    current_token: Token,
    tokens: std::vec::IntoIter<Token>,
    /// Number of expressions and bodies currently being parsed inside each other.
    nesting: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        Self {
            current_token: tokens
                .next()
                .unwrap_or_else(|| Token::new(TokenKind::Eof, "", 0..0)),
            tokens,
            nesting: 0,
        }
    }
}

impl Parser {
    /// Parses a whole program: statements until the end of input.
    pub fn parse_program(&mut self) -> ParseResult<Node> {
        let mut body = Vec::new();
        while self.current_token.kind != TokenKind::Eof {
            body.push(self.parse_stmt()?);
        }
        log::debug!("parsed program with {} statements", body.len());
        Ok(Node::program(body))
    }
}

/// Parse utilities
impl Parser {
    /// Advances to the next token and returns the previous one.
    /// Past the end, `current_token` stays on the end-of-input token.
    fn next(&mut self) -> Token {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => {
                let end = self.current_token.span.end;
                Token::new(TokenKind::Eof, "", end..end)
            }
        };
        mem::replace(&mut self.current_token, next)
    }

    /// Predicate that tests whether the current token has the same kind
    /// and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token.kind == kind {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats a token of kind `kind` or fails with an error naming `expected`.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.current_token.kind == kind {
            Ok(self.next())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Creates an error for the current token.
    /// Error tokens from the lexer are reported as such rather than as syntax errors.
    fn unexpected(&self, expected: &str) -> ParseError {
        if let Some(err) = self.current_token.lex_error() {
            return err.into();
        }
        let found = match self.current_token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.current_token.text),
        };
        SyntaxError::new(
            format!("expected {}, found {}", expected, found),
            &self.current_token.text,
            self.current_token.span.clone(),
        )
        .into()
    }

    /// Creates an error for a token that cannot appear where it is.
    fn unexpected_token(&self) -> ParseError {
        if let Some(err) = self.current_token.lex_error() {
            return err.into();
        }
        if self.current_token.kind == TokenKind::Eof {
            return self.unexpected("statement");
        }
        SyntaxError::new(
            format!("unexpected token `{}`", self.current_token.text),
            &self.current_token.text,
            self.current_token.span.clone(),
        )
        .into()
    }

    /// Runs `parse` one nesting level deeper, failing once [`MAX_NESTING`] is reached.
    fn nested<T>(
        &mut self,
        what: &str,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(SyntaxError::new(
                format!("{} nested too deeply", what),
                &self.current_token.text,
                self.current_token.span.clone(),
            )
            .into());
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }
}

/// Parses a token stream produced by [`crate::lexer::tokenize`] into a [`Node::Program`].
pub fn parse(tokens: Vec<Token>) -> ParseResult<Node> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_err(source: &str) -> ParseError {
        parse(tokenize(source)).unwrap_err()
    }

    fn syntax_message(source: &str) -> String {
        match parse_err(source) {
            ParseError::Syntax(err) => err.message().to_string(),
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse(tokenize("")).unwrap(), Node::program(vec![]));
        assert_eq!(parse(Vec::new()).unwrap(), Node::program(vec![]));
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(syntax_message("(1 + 2"), "expected `)`, found end of input");
        assert_eq!(syntax_message("f(1, 2"), "expected `,` or `)`, found end of input");
    }

    #[test]
    fn test_missing_then_do() {
        assert_eq!(syntax_message("if 1 x"), "expected `then`, found `x`");
        assert_eq!(syntax_message("while 1 x"), "expected `do`, found `x`");
    }

    #[test]
    fn test_stray_tokens() {
        assert_eq!(syntax_message("1 )"), "unexpected token `)`");
        assert_eq!(syntax_message("then"), "unexpected token `then`");
        assert_eq!(syntax_message("1 +"), "expected expression, found end of input");
        assert_eq!(syntax_message("1 , 2"), "unexpected token `,`");
        assert_eq!(syntax_message("if 1 then 2 else 3 else 4"), "unexpected token `else`");
    }

    #[test]
    fn test_deep_parens() {
        let depth = MAX_NESTING + 800;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        match parse_err(&source) {
            ParseError::Syntax(err) => {
                assert_eq!(err.message(), "expression nested too deeply");
                assert_eq!(err.span(), &(MAX_NESTING..MAX_NESTING + 1));
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }

        let source = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(
            parse(tokenize(&source)).unwrap(),
            Node::program(vec![Node::expr_stmt(Node::number(1.0))])
        );
    }

    #[test]
    fn test_deep_calls_and_bodies() {
        let source = format!("{}x{}", "f(".repeat(1000), ")".repeat(1000));
        assert_eq!(syntax_message(&source), "expression nested too deeply");

        let source = format!("{}x", "call ".repeat(1000));
        assert_eq!(syntax_message(&source), "expression nested too deeply");

        let source = format!("{}x", "if 1 then ".repeat(1000));
        assert!(syntax_message(&source).ends_with("nested too deeply"));
        let source = format!("{}x", "while 1 do ".repeat(1000));
        assert!(syntax_message(&source).ends_with("nested too deeply"));
    }

    #[test]
    fn test_long_flat_sum() {
        // left-nested chains are built by a loop, not by nesting
        let source = vec!["1"; 20000].join(" + ");
        assert!(parse(tokenize(&source)).is_ok());
    }

    #[test]
    fn test_syntax_error_carries_token() {
        match parse_err("if 1 x") {
            ParseError::Syntax(err) => {
                assert_eq!(err.found(), "x");
                assert_eq!(err.span(), &(5..6));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lex_errors_surface() {
        assert_eq!(
            parse_err("1 + $"),
            ParseError::Lex(LexError::UnexpectedChar { ch: '$', span: 4..5 })
        );
        assert_eq!(
            parse_err("f(\"abc"),
            ParseError::Lex(LexError::UnterminatedString { span: 2..6 })
        );
        assert_eq!(parse_err("1 $").span(), &(2..3));
    }
}
