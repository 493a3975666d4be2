//! Constant folding and dead branch elimination.

use std::rc::Rc;

use butha_parser::ast::{Literal, Node};
use butha_value::Value;

use crate::stats::NodeCount;

/// Returns a simplified copy of `node` that evaluates to the same result.
///
/// Rules, applied bottom-up:
/// * a binary expression over two number literals becomes the literal result;
/// * an `if` with a literal condition becomes the branch it would take (or `null`);
/// * a `while` with a falsy literal condition becomes `null`.
///
/// Running the pass on its own output returns an equal tree.
pub fn optimize(node: &Node) -> Node {
    let optimized = fold(node);
    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "optimized {} nodes into {}",
            NodeCount::of(node).total,
            NodeCount::of(&optimized).total
        );
    }
    optimized
}

fn is_truthy(literal: &Literal) -> bool {
    Value::from(literal).is_truthy()
}

fn fold(node: &Node) -> Node {
    match node {
        Node::Program(body) => Node::program(body.iter().map(fold).collect()),
        Node::Literal(_) | Node::Identifier(_) => node.clone(),
        Node::Binary { .. } => fold_binary(node),
        Node::Call { callee, args } => Node::call(fold(callee), args.iter().map(fold).collect()),
        Node::FnDeclaration {
            ident,
            params,
            body,
        } => Node::FnDeclaration {
            ident: ident.clone(),
            params: Rc::clone(params),
            body: Rc::new(fold(body)),
        },
        Node::If {
            condition,
            consequent,
            alternate,
        } => {
            let condition = fold(condition);
            match condition.as_literal() {
                Some(literal) if is_truthy(literal) => fold(consequent),
                Some(_) => alternate.as_deref().map_or_else(Node::null, fold),
                None => Node::if_stmt(
                    condition,
                    fold(consequent),
                    alternate.as_deref().map(fold),
                ),
            }
        }
        Node::While { condition, body } => {
            let condition = fold(condition);
            match condition.as_literal() {
                // never runs
                Some(literal) if !is_truthy(literal) => Node::null(),
                // an infinite loop is kept as is
                _ => Node::while_stmt(condition, fold(body)),
            }
        }
        Node::ExprStmt(expr) => Node::expr_stmt(fold(expr)),
    }
}

/// Folds a binary expression, following its left operands with a loop:
/// `1 + 2 + 3 + ...` nests to the left as deep as it is long.
fn fold_binary(node: &Node) -> Node {
    let mut spine = Vec::new();
    let mut leftmost = node;
    while let Node::Binary { op, lhs, rhs } = leftmost {
        spine.push((*op, rhs.as_ref()));
        leftmost = lhs;
    }

    let mut folded = fold(leftmost);
    for (op, rhs) in spine.into_iter().rev() {
        let rhs = fold(rhs);
        folded = match (&folded, &rhs) {
            (Node::Literal(Literal::Number(l)), Node::Literal(Literal::Number(r))) => {
                Node::number(op.apply(*l, *r))
            }
            _ => Node::binary(op, folded, rhs),
        };
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use butha_parser::ast::BinaryOp;
    use butha_parser::parse_str;
    use insta::assert_snapshot;

    fn optimized(source: &str) -> Node {
        optimize(&parse_str(source).unwrap())
    }

    fn stmt(source: &str) -> Node {
        match &optimized(source) {
            Node::Program(body) => {
                assert_eq!(body.len(), 1);
                body[0].clone()
            }
            other => panic!("not a program: {:?}", other),
        }
    }

    #[test]
    fn test_fold_literal_pair() {
        let folded = optimize(&Node::binary(BinaryOp::Add, Node::number(2.0), Node::number(3.0)));
        assert_eq!(folded, Node::number(5.0));
        assert_eq!(optimize(&folded), folded);
    }

    #[test]
    fn test_fold_nested() {
        assert_eq!(stmt("(5 + 3) * (10 - 2)"), Node::expr_stmt(Node::number(64.0)));
        assert_eq!(stmt("1 + 2 * 3 - 4 / 2"), Node::expr_stmt(Node::number(5.0)));
    }

    #[test]
    fn test_fold_division_by_zero() {
        assert_eq!(stmt("1 / 0"), Node::expr_stmt(Node::number(f64::INFINITY)));
        assert_eq!(stmt("0 - 1 / 0"), Node::expr_stmt(Node::number(f64::NEG_INFINITY)));
        match &stmt("0 / 0") {
            Node::ExprStmt(expr) => match expr.as_ref() {
                Node::Literal(Literal::Number(val)) => assert!(val.is_nan()),
                other => panic!("not folded: {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_partial_fold() {
        // `x + 1 + 2` is `(x + 1) + 2`: nothing to fold
        assert_snapshot!(stmt("x + 1 + 2").to_string(), @r###"
        ExpressionStatement
          BinaryExpression: +
            BinaryExpression: +
              Identifier: x
              Literal: 1
            Literal: 2
        "###);
        assert_eq!(
            stmt("x * (2 + 3)"),
            Node::expr_stmt(Node::binary(
                BinaryOp::Mul,
                Node::identifier("x"),
                Node::number(5.0)
            ))
        );
    }

    #[test]
    fn test_strings_are_not_folded() {
        assert_eq!(
            stmt(r#""a" + "b""#),
            Node::expr_stmt(Node::binary(BinaryOp::Add, Node::string("a"), Node::string("b")))
        );
    }

    #[test]
    fn test_if_with_literal_condition() {
        assert_eq!(stmt("if 1 then x else y"), Node::identifier("x"));
        assert_eq!(stmt("if 0 then x else y"), Node::identifier("y"));
        assert_eq!(stmt("if 0 then x"), Node::null());
        assert_eq!(stmt("if 2 - 2 then x else y"), Node::identifier("y"));
        assert_eq!(stmt(r#"if "" then x else y"#), Node::identifier("y"));
        assert_eq!(stmt(r#"if "no" then x else y"#), Node::identifier("x"));
    }

    #[test]
    fn test_if_with_dynamic_condition() {
        assert_eq!(
            stmt("if c then 1 + 1 else 2 * 2"),
            Node::if_stmt(Node::identifier("c"), Node::number(2.0), Some(Node::number(4.0)))
        );
    }

    #[test]
    fn test_while_with_falsy_literal() {
        assert_eq!(stmt("while 0 do f()"), Node::null());
        assert_eq!(stmt("while 1 - 1 do f()"), Node::null());
    }

    #[test]
    fn test_while_with_truthy_literal_is_kept() {
        assert_eq!(
            stmt("while 1 do f(2 * 3)"),
            Node::while_stmt(
                Node::number(1.0),
                Node::call(Node::identifier("f"), vec![Node::number(6.0)])
            )
        );
    }

    #[test]
    fn test_function_body_is_optimized() {
        assert_eq!(
            stmt("function f(a) if 1 then a + (1 + 1)"),
            Node::function(
                "f",
                vec!["a".into()],
                Node::binary(BinaryOp::Add, Node::identifier("a"), Node::number(2.0))
            )
        );
    }

    #[test]
    fn test_long_chains() {
        let source = vec!["1"; 20000].join(" + ");
        assert_eq!(stmt(&source), Node::expr_stmt(Node::number(20000.0)));

        // `x + 1 + 1 + ...` keeps its shape: every sum has `x` on its left
        let source = format!("x{}", " + 1".repeat(20000));
        let folded = optimized(&source);
        assert_eq!(NodeCount::of(&folded).total, 2 + 2 * 20000 + 1);
    }

    #[test]
    fn test_idempotent() {
        for source in [
            "function f(a, b) if a then b * (2 + 2) else while 0 do a",
            "call f(1 + 1, (2 * 3), g(4 / 2))",
            "while x do if 0 then y else z - (3 * 3)",
        ] {
            let once = optimized(source);
            assert_eq!(optimize(&once), once, "{}", source);
        }
    }
}
