//! AST definitions for Funktion

mod node;
mod operator;

pub use node::Node;
pub use operator::{AddOp, BitOp, CmpOp, MulOp, ShiftOp, UnaryOp};
