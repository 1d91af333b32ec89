//! Typed AST nodes
//!
//! One closed union over the program's syntactic forms. Trees are immutable
//! once built; the optimizer produces new trees rather than mutating shared
//! ones. The semantic type of a node is derived by `Node::ty()` with an
//! exhaustive match, so a node's type can only change by replacing the node.

use super::operator::{AddOp, BitOp, CmpOp, MulOp, ShiftOp, UnaryOp};
use crate::types::Type;
use serde::{Deserialize, Serialize};

/// AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Whole compilation unit
    Program {
        global_range: Option<Box<Node>>,
        statements: Vec<Node>,
    },

    /// Function definition `f(x) = body`
    FuncDef {
        name: String,
        param: String,
        body: Box<Node>,
    },

    /// Function call `f(arg)`
    FuncCall { name: String, arg: Box<Node> },

    /// Top-level comma-like expression sequence
    Expr { first: Box<Node>, rest: Vec<Node> },

    /// Slice body: parallel sub-expressions evaluated at one axis point
    Slice { exprs: Vec<Node> },

    /// Ternary conditional `? l op r -> then : else`
    Cond {
        left: Box<Node>,
        op: CmpOp,
        right: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },

    /// Bitwise operation
    Bitwise {
        left: Box<Node>,
        op: BitOp,
        right: Box<Node>,
    },

    /// Shift operation
    Shift {
        left: Box<Node>,
        op: ShiftOp,
        right: Box<Node>,
    },

    /// Additive operation (also string concatenation for `+`)
    Add {
        left: Box<Node>,
        op: AddOp,
        right: Box<Node>,
    },

    /// Multiplicative operation
    Mul {
        left: Box<Node>,
        op: MulOp,
        right: Box<Node>,
    },

    /// Exponentiation `base ** exponent`
    Pow {
        base: Box<Node>,
        exponent: Box<Node>,
    },

    /// Unary negation or bitwise NOT
    Unary { op: UnaryOp, operand: Box<Node> },

    /// `print(expr)`
    Print { expr: Box<Node> },

    /// `f(x).step(n)`: advance x's stream cell by n using f
    Step {
        func: String,
        param: String,
        count: f64,
    },

    /// `input(prompt)`: suspending value acquisition
    Input { prompt: Box<Node> },

    /// `expr : n`: bounded prefix read of a cell's history
    Time { target: Box<Node>, count: Box<Node> },

    /// Program-level axis descriptor
    GlobalRange {
        range: Box<Node>,
        timestep: Option<Box<Node>>,
    },

    /// Numeric range `` `start..end` `` (end omissible)
    NumRange {
        start: Box<Node>,
        end: Option<Box<Node>>,
    },

    /// Character range `` `'a'..'z'` `` (end omissible)
    CharRange {
        start: Box<Node>,
        end: Option<Box<Node>>,
    },

    /// Timestep `tNt`
    Timestep { value: Box<Node> },

    /// Number literal
    Number(f64),

    /// String literal
    Str(String),

    /// Char literal
    Char(char),

    /// Identifier reference
    Ident(String),
}

impl Node {
    /// Semantic type of this node, assigned exactly the way analysis
    /// assigns it at construction.
    pub fn ty(&self) -> Type {
        match self {
            Node::Program { .. }
            | Node::Print { .. }
            | Node::Time { .. }
            | Node::GlobalRange { .. }
            | Node::NumRange { .. }
            | Node::CharRange { .. }
            | Node::Timestep { .. } => Type::Void,

            Node::FuncDef { .. }
            | Node::FuncCall { .. }
            | Node::Step { .. }
            | Node::Input { .. }
            | Node::Ident(_) => Type::Any,

            Node::Expr { first, .. } => first.ty(),
            Node::Slice { exprs } => exprs.first().map(Node::ty).unwrap_or(Type::Any),
            Node::Cond { then_branch, .. } => then_branch.ty(),

            Node::Bitwise { left, .. }
            | Node::Shift { left, .. }
            | Node::Add { left, .. }
            | Node::Mul { left, .. } => left.ty(),
            Node::Pow { base, .. } => base.ty(),
            Node::Unary { operand, .. } => operand.ty(),

            Node::Number(_) => Type::Number,
            Node::Str(_) => Type::String,
            Node::Char(_) => Type::Char,
        }
    }

    /// Returns true for literal nodes
    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Number(_) | Node::Str(_) | Node::Char(_))
    }

    /// Numeric value if this is a number literal
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Create a program node
    pub fn program(global_range: Option<Node>, statements: Vec<Node>) -> Self {
        Node::Program {
            global_range: global_range.map(Box::new),
            statements,
        }
    }

    /// Create a function definition
    pub fn func_def(name: impl Into<String>, param: impl Into<String>, body: Node) -> Self {
        Node::FuncDef {
            name: name.into(),
            param: param.into(),
            body: Box::new(body),
        }
    }

    /// Create a function call
    pub fn func_call(name: impl Into<String>, arg: Node) -> Self {
        Node::FuncCall {
            name: name.into(),
            arg: Box::new(arg),
        }
    }

    /// Create an expression sequence
    pub fn expr(first: Node, rest: Vec<Node>) -> Self {
        Node::Expr {
            first: Box::new(first),
            rest,
        }
    }

    /// Create a slice body
    pub fn slice(exprs: Vec<Node>) -> Self {
        Node::Slice { exprs }
    }

    /// Create a ternary conditional
    pub fn cond(left: Node, op: CmpOp, right: Node, then_branch: Node, else_branch: Node) -> Self {
        Node::Cond {
            left: Box::new(left),
            op,
            right: Box::new(right),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Create a bitwise expression
    pub fn bitwise(left: Node, op: BitOp, right: Node) -> Self {
        Node::Bitwise {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a shift expression
    pub fn shift(left: Node, op: ShiftOp, right: Node) -> Self {
        Node::Shift {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create an additive expression
    pub fn add(left: Node, op: AddOp, right: Node) -> Self {
        Node::Add {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a multiplicative expression
    pub fn mul(left: Node, op: MulOp, right: Node) -> Self {
        Node::Mul {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create an exponentiation
    pub fn pow(base: Node, exponent: Node) -> Self {
        Node::Pow {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a print statement
    pub fn print(expr: Node) -> Self {
        Node::Print {
            expr: Box::new(expr),
        }
    }

    /// Create a step call
    pub fn step(func: impl Into<String>, param: impl Into<String>, count: f64) -> Self {
        Node::Step {
            func: func.into(),
            param: param.into(),
            count,
        }
    }

    /// Create an input expression
    pub fn input(prompt: Node) -> Self {
        Node::Input {
            prompt: Box::new(prompt),
        }
    }

    /// Create a time call
    pub fn time(target: Node, count: Node) -> Self {
        Node::Time {
            target: Box::new(target),
            count: Box::new(count),
        }
    }

    /// Create a global range
    pub fn global_range(range: Node, timestep: Option<Node>) -> Self {
        Node::GlobalRange {
            range: Box::new(range),
            timestep: timestep.map(Box::new),
        }
    }

    /// Create a numeric range
    pub fn num_range(start: Node, end: Option<Node>) -> Self {
        Node::NumRange {
            start: Box::new(start),
            end: end.map(Box::new),
        }
    }

    /// Create a character range
    pub fn char_range(start: Node, end: Option<Node>) -> Self {
        Node::CharRange {
            start: Box::new(start),
            end: end.map(Box::new),
        }
    }

    /// Create a timestep
    pub fn timestep(value: Node) -> Self {
        Node::Timestep {
            value: Box::new(value),
        }
    }

    /// Create a number literal
    pub fn number(value: f64) -> Self {
        Node::Number(value)
    }

    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Node::Str(value.into())
    }

    /// Create an identifier
    pub fn ident(name: impl Into<String>) -> Self {
        Node::Ident(name.into())
    }
}
