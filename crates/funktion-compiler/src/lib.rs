//! Funktion Compiler - middle and back end
//!
//! This crate turns a parse tree into a running JavaScript program:
//! semantic analysis (scope + type checking), constant folding, and code
//! generation including the streaming runtime.

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod optimizer;
pub mod semantic;

// Re-export main types
pub use compiler::{Compiler, CompilerOptions};
pub use error::{CompileError, Result};

// Re-export phase entry points
pub use codegen::Generator;
pub use optimizer::ConstantFolder;
pub use semantic::Analyzer;
