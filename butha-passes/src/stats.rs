//! Node statistics.

use butha_parser::ast::Node;
use butha_parser::visitor::{walk_node, Visitor};

/// Counts the nodes of a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCount {
    pub total: usize,
    pub literals: usize,
    pub calls: usize,
}

impl NodeCount {
    pub fn of(node: &Node) -> Self {
        let mut count = Self::default();
        count.visit_node(node);
        count
    }
}

impl<'ast> Visitor<'ast> for NodeCount {
    fn visit_node(&mut self, node: &'ast Node) {
        // left-nested chains can be as deep as they are long
        let mut node = node;
        while let Node::Binary { lhs, rhs, .. } = node {
            self.total += 1;
            self.visit_node(rhs);
            node = lhs;
        }

        self.total += 1;
        match node {
            Node::Literal(_) => self.literals += 1,
            Node::Call { .. } => self.calls += 1,
            _ => {}
        }
        walk_node(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butha_parser::parse_str;

    #[test]
    fn test_count() {
        let ast = parse_str("function f(a) a + 1  call f(2)").unwrap();
        // Program, FnDeclaration, Binary, Identifier, Literal, ExprStmt, Call, Identifier, Literal
        assert_eq!(
            NodeCount::of(&ast),
            NodeCount {
                total: 9,
                literals: 2,
                calls: 1
            }
        );
    }
}
