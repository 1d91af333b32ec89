//! Tree-rewrite optimizations: constant folding and algebraic
//! simplification

mod constant_folding;

pub use constant_folding::ConstantFolder;
