//! Operators for Funktion expressions

use serde::{Deserialize, Serialize};

/// Comparison operators (ternary conditions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
}

impl CmpOp {
    /// Source symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    /// JavaScript rendering; equality goes strict (`===` / `!==`)
    pub fn js(&self) -> &'static str {
        match self {
            CmpOp::Eq => "===",
            CmpOp::Ne => "!==",
            other => other.symbol(),
        }
    }

    /// Parse an operator from its source symbol
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Le),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    /// Evaluate the comparison over two numbers
    pub fn eval(&self, left: f64, right: f64) -> bool {
        match self {
            CmpOp::Eq => left == right,
            CmpOp::Ne => left != right,
            CmpOp::Lt => left < right,
            CmpOp::Le => left <= right,
            CmpOp::Gt => left > right,
            CmpOp::Ge => left >= right,
        }
    }
}

/// Bitwise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitOp {
    /// Bitwise AND (&)
    And,
    /// Bitwise OR (|)
    Or,
    /// Bitwise XOR (^)
    Xor,
}

impl BitOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BitOp::And => "&",
            BitOp::Or => "|",
            BitOp::Xor => "^",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "&" => Some(BitOp::And),
            "|" => Some(BitOp::Or),
            "^" => Some(BitOp::Xor),
            _ => None,
        }
    }
}

/// Shift operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftOp {
    /// Shift left (<<)
    Shl,
    /// Shift right (>>)
    Shr,
}

impl ShiftOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ShiftOp::Shl => "<<",
            ShiftOp::Shr => ">>",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "<<" => Some(ShiftOp::Shl),
            ">>" => Some(ShiftOp::Shr),
            _ => None,
        }
    }
}

/// Additive operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOp {
    /// Addition (+); also string concatenation
    Add,
    /// Subtraction (-)
    Sub,
}

impl AddOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AddOp::Add => "+",
            AddOp::Sub => "-",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(AddOp::Add),
            "-" => Some(AddOp::Sub),
            _ => None,
        }
    }
}

/// Multiplicative operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MulOp {
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
}

impl MulOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            MulOp::Mul => "*",
            MulOp::Div => "/",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "*" => Some(MulOp::Mul),
            "/" => Some(MulOp::Div),
            _ => None,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation (-)
    Neg,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "~",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "-" => Some(UnaryOp::Neg),
            "~" => Some(UnaryOp::BitNot),
            _ => None,
        }
    }
}
