//! Source code representation and error management.

use std::{fmt, ops::Range};

use console::style;
use thiserror::Error;

/// A byte range into the source text.
pub type Span = Range<usize>;

/// Represents source code.
pub struct Source<'a> {
    /// Name shown in diagnostics (usually a file path or `<eval>`).
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self::named("<input>", content)
    }

    pub fn named(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Returns the 1-based line and column of the byte `offset`.
    /// Offsets past the end of the content map to the position right after the last character.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let before = self.content.get(..offset).unwrap_or(self.content);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        Position { line, column }
    }

    /// Returns the text of the 1-based `line`, without its line terminator.
    pub fn line(&self, line: usize) -> Option<&'a str> {
        self.content.lines().nth(line.checked_sub(1)?)
    }

    /// Renders a diagnostic pointing at `span`.
    ///
    /// The output looks like:
    /// ```text
    /// error: expected `then`, found `x`
    ///  --> script.bu:1:6
    ///   |
    /// 1 | if 1 x
    ///   |      ^
    /// ```
    pub fn report(&self, message: impl fmt::Display, span: Option<&Span>) -> String {
        let mut out = format!("{}: {}\n", style("error").red().bold(), message);
        let span = match span {
            Some(span) => span,
            None => return out,
        };

        let Position { line, column } = self.position(span.start);
        out.push_str(&format!(" {} {}:{}:{}\n", style("-->").blue(), self.name, line, column));

        if let Some(text) = self.line(line) {
            let gutter = " ".repeat(line.to_string().len());
            let width = self
                .content
                .get(span.clone())
                .map_or(1, |slice| slice.chars().take_while(|&c| c != '\n').count())
                .max(1);
            out.push_str(&format!("{} {}\n", gutter, style("|").blue()));
            out.push_str(&format!("{} {} {}\n", style(line).blue(), style("|").blue(), text));
            out.push_str(&format!(
                "{} {} {}{}\n",
                gutter,
                style("|").blue(),
                " ".repeat(column - 1),
                style("^".repeat(width)).red()
            ));
        }
        out
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a lexical error: the scanner could not classify part of the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unrecognized character `{ch}`")]
    UnexpectedChar { ch: char, span: Span },
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedChar { span, .. } | LexError::UnterminatedString { span } => span,
        }
    }
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    message: String,
    /// Text of the offending token (empty at end of input).
    found: String,
    span: Span,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message`, offending token text and `span`.
    pub fn new(message: impl ToString, found: impl ToString, span: Span) -> Self {
        Self {
            message: message.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn found(&self) -> &str {
        &self.found
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
