//! Indented tree rendering of the AST.

use std::fmt::{self, Write};

use console::style;

use crate::ast::Node;

/// Renders a [`Node`] as an indented tree, one node per line.
///
/// ```text
/// Program
///   FunctionDeclaration: add
///     Params: [a, b]
///     BinaryExpression: +
///       Identifier: a
///       Identifier: b
/// ```
pub struct Printer {
    colored: bool,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            colored: false,
            indent: 2,
        }
    }

    /// Highlights node names and labels. Only takes effect when the terminal supports colors.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn print(&self, node: &Node) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.write_node(&mut out, node, 0);
        out
    }

    fn kind(&self, name: &str) -> String {
        if self.colored {
            style(name).cyan().bold().to_string()
        } else {
            name.to_string()
        }
    }

    fn label(&self, name: &str) -> String {
        if self.colored {
            style(name).dim().to_string()
        } else {
            name.to_string()
        }
    }

    fn write_node(&self, out: &mut String, node: &Node, depth: usize) -> fmt::Result {
        let pad = " ".repeat(depth * self.indent);
        let label_pad = " ".repeat((depth + 1) * self.indent);
        let kind = self.kind(node.kind_name());

        match node {
            Node::Program(body) => {
                writeln!(out, "{}{}", pad, kind)?;
                for stmt in body {
                    self.write_node(out, stmt, depth + 1)?;
                }
            }
            Node::Literal(literal) => writeln!(out, "{}{}: {}", pad, kind, literal)?,
            Node::Identifier(ident) => writeln!(out, "{}{}: {}", pad, kind, ident)?,
            Node::Binary { op, lhs, rhs } => {
                writeln!(out, "{}{}: {}", pad, kind, op)?;
                self.write_node(out, lhs, depth + 1)?;
                self.write_node(out, rhs, depth + 1)?;
            }
            Node::Call { callee, args } => {
                writeln!(out, "{}{}", pad, kind)?;
                self.write_node(out, callee, depth + 1)?;
                if !args.is_empty() {
                    writeln!(out, "{}{}", label_pad, self.label("Arguments:"))?;
                    for arg in args {
                        self.write_node(out, arg, depth + 2)?;
                    }
                }
            }
            Node::FnDeclaration {
                ident,
                params,
                body,
            } => {
                writeln!(out, "{}{}: {}", pad, kind, ident)?;
                writeln!(out, "{}{} [{}]", label_pad, self.label("Params:"), params.join(", "))?;
                self.write_node(out, body, depth + 1)?;
            }
            Node::If {
                condition,
                consequent,
                alternate,
            } => {
                writeln!(out, "{}{}", pad, kind)?;
                self.write_node(out, condition, depth + 1)?;
                writeln!(out, "{}{}", label_pad, self.label("Consequent:"))?;
                self.write_node(out, consequent, depth + 2)?;
                if let Some(alternate) = alternate {
                    writeln!(out, "{}{}", label_pad, self.label("Alternate:"))?;
                    self.write_node(out, alternate, depth + 2)?;
                }
            }
            Node::While { condition, body } => {
                writeln!(out, "{}{}", pad, kind)?;
                self.write_node(out, condition, depth + 1)?;
                writeln!(out, "{}{}", label_pad, self.label("Body:"))?;
                self.write_node(out, body, depth + 2)?;
            }
            Node::ExprStmt(expr) => {
                writeln!(out, "{}{}", pad, kind)?;
                self.write_node(out, expr, depth + 1)?;
            }
        }

        Ok(())
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer::new().print(self))
    }
}
