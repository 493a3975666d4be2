use std::rc::Rc;
use std::{fmt, mem};

/// Arithmetic operators. All four are left-associative; `*` and `/` bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Numeric semantics of the operator (IEEE 754, so `1 / 0` is `inf`).
    /// Shared by constant folding and evaluation.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    /// Produced by the optimizer for statements that do nothing.
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(val) => write!(f, "{}", val),
            Literal::String(val) => write!(f, "{:?}", val),
            Literal::Bool(val) => write!(f, "{}", val),
            Literal::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Top level statements, evaluated in order.
    Program(Vec<Node>),
    Literal(Literal),
    /// An identifier (e.g. `foo`).
    Identifier(String),
    /// A binary expression (e.g. `1+1`).
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// A call expression (e.g. `call foo(1)` or `foo(1)`).
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    /// `function ident(params) body`. Params and body are shared with the function values
    /// created from this declaration.
    FnDeclaration {
        ident: String,
        params: Rc<[String]>,
        body: Rc<Node>,
    },
    If {
        condition: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    ExprStmt(Box<Node>),
}

/// Constructors.
impl Node {
    pub fn program(body: Vec<Node>) -> Self {
        Node::Program(body)
    }

    pub fn number(val: f64) -> Self {
        Node::Literal(Literal::Number(val))
    }

    pub fn string(val: impl Into<String>) -> Self {
        Node::Literal(Literal::String(val.into()))
    }

    pub fn bool(val: bool) -> Self {
        Node::Literal(Literal::Bool(val))
    }

    pub fn null() -> Self {
        Node::Literal(Literal::Null)
    }

    pub fn identifier(ident: impl Into<String>) -> Self {
        Node::Identifier(ident.into())
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
        Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(ident: impl Into<String>, params: Vec<String>, body: Node) -> Self {
        Node::FnDeclaration {
            ident: ident.into(),
            params: params.into(),
            body: Rc::new(body),
        }
    }

    pub fn if_stmt(condition: Node, consequent: Node, alternate: Option<Node>) -> Self {
        Node::If {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        }
    }

    pub fn while_stmt(condition: Node, body: Node) -> Self {
        Node::While {
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }

    pub fn expr_stmt(expr: Node) -> Self {
        Node::ExprStmt(Box::new(expr))
    }
}

impl Node {
    /// Name of the node variant, as shown by the AST printer.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program(_) => "Program",
            Node::Literal(_) => "Literal",
            Node::Identifier(_) => "Identifier",
            Node::Binary { .. } => "BinaryExpression",
            Node::Call { .. } => "CallExpression",
            Node::FnDeclaration { .. } => "FunctionDeclaration",
            Node::If { .. } => "IfStatement",
            Node::While { .. } => "WhileStatement",
            Node::ExprStmt(_) => "ExpressionStatement",
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // A chain like `1 + 2 + 3 + ...` nests to the left as deep as it is long.
        // Unlink it iteratively so dropping does not recurse once per operator.
        let mut spine = match self {
            Node::Binary { lhs, .. } => mem::replace(lhs, Box::new(Node::null())),
            _ => return,
        };
        while let Node::Binary { lhs, .. } = &mut *spine {
            let next = mem::replace(lhs, Box::new(Node::null()));
            spine = next;
        }
    }
}
