//! Semantic type definitions

mod semantic;

pub use semantic::Type;
