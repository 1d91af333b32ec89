//! Compiler error types
//!
//! Every diagnostic carries the responsible token's location; `SourceLoc`
//! renders the `Line L, col C: ` prefix the messages are built on. All
//! analyzer errors are fatal; the first violation aborts the run.

use funktion_core::{SourceLoc, Type};
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    /// ScopeError: repeat declaration of a function name
    #[error("{loc}Identifier {name} already declared")]
    AlreadyDeclared { loc: SourceLoc, name: String },

    /// ScopeError: lookup exhausted the scope chain
    #[error("{loc}Identifier {name} not declared")]
    NotDeclared { loc: SourceLoc, name: String },

    /// TypeError: binary operands disagree
    #[error("{loc}Operands do not have the same type. Given {left} and {right} types")]
    OperandMismatch {
        loc: SourceLoc,
        left: Type,
        right: Type,
    },

    /// TypeError: operand type unsupported by the operator
    #[error("{loc}Operator does not support {given} types. Expected {expected}")]
    UnsupportedOperand {
        loc: SourceLoc,
        given: Type,
        expected: Type,
    },

    /// ContextError: input outside any function body
    #[error("{loc}Input statements must be inside functions")]
    InputOutsideFunction { loc: SourceLoc },

    /// The recognizer handed over a tree violating the parse-tree contract
    #[error("{loc}Malformed parse tree: {message}")]
    MalformedTree { loc: SourceLoc, message: String },
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
