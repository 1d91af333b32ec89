//! JavaScript code generation: target-name hygiene, the emitted streaming
//! runtime, and the generator itself

mod generator;
mod names;
mod runtime;

pub use generator::Generator;
pub use names::NameTable;
