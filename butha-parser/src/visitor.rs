//! Visitor pattern for AST nodes.

use crate::ast::Node;

pub trait Visitor<'ast>: Sized {
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }
}

/// Visits every child of `node`, in source order.
pub fn walk_node<'ast>(visitor: &mut impl Visitor<'ast>, node: &'ast Node) {
    match node {
        Node::Program(body) => {
            for stmt in body {
                visitor.visit_node(stmt);
            }
        }
        Node::Literal(_) => {}
        Node::Identifier(_) => {}
        Node::Binary { op: _, lhs, rhs } => {
            visitor.visit_node(lhs);
            visitor.visit_node(rhs);
        }
        Node::Call { callee, args } => {
            visitor.visit_node(callee);
            for arg in args {
                visitor.visit_node(arg);
            }
        }
        Node::FnDeclaration {
            ident: _,
            params: _,
            body,
        } => visitor.visit_node(body),
        Node::If {
            condition,
            consequent,
            alternate,
        } => {
            visitor.visit_node(condition);
            visitor.visit_node(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_node(alternate);
            }
        }
        Node::While { condition, body } => {
            visitor.visit_node(condition);
            visitor.visit_node(body);
        }
        Node::ExprStmt(expr) => visitor.visit_node(expr),
    }
}
