//! Funktion Core - Core types and definitions for the Funktion compiler
//!
//! This crate provides the fundamental types shared by every compiler phase:
//! - Semantic types for the type checker
//! - AST (Abstract Syntax Tree) definitions
//! - The parse-tree (CST) contract consumed by the analyzer
//! - Symbol-table entities and lexical scopes
//! - Error types

pub mod ast;
pub mod cst;
pub mod error;
pub mod loc;
pub mod symbol;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use loc::SourceLoc;
pub use types::Type;
