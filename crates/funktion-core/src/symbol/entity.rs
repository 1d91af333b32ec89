//! Symbol-table entities

use crate::types::Type;
use serde::{Deserialize, Serialize};

/// Value stored in a scope for a declared name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    /// User-declared function
    Function { name: String },

    /// Function parameter; the recurrence variable, always numeric
    Parameter { name: String, ty: Type },

    /// Built-in function (`print`, `input`, `step`)
    Intrinsic { name: String },

    /// Pre-seeded primitive type name (`number`, `string`, ...)
    Primitive { ty: Type },
}

impl Entity {
    /// Semantic type carried by the entity
    pub fn ty(&self) -> Type {
        match self {
            Entity::Function { .. } | Entity::Intrinsic { .. } => Type::Function,
            Entity::Parameter { ty, .. } => *ty,
            Entity::Primitive { ty } => *ty,
        }
    }

    /// Create a function entity
    pub fn function(name: impl Into<String>) -> Self {
        Entity::Function { name: name.into() }
    }

    /// Create a parameter entity
    pub fn parameter(name: impl Into<String>, ty: Type) -> Self {
        Entity::Parameter {
            name: name.into(),
            ty,
        }
    }

    /// Create an intrinsic entity
    pub fn intrinsic(name: impl Into<String>) -> Self {
        Entity::Intrinsic { name: name.into() }
    }
}
