//! Semantic analysis: scope resolution and type checking

mod analyzer;

pub use analyzer::{analyze, Analyzer};
