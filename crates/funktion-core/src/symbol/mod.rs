//! Symbol-table entities and lexical scopes

mod entity;
mod scope;

pub use entity::Entity;
pub use scope::Scope;
