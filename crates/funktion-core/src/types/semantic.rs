//! Semantic types for Funktion expressions
//!
//! Every AST node carries one of these types. Diagnostics interpolate the
//! lowercase rendering (`number`, `string`, ...), so `Display` is part of
//! the error-message contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of an expression or entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Numeric value (f64, handles both int and float)
    Number,
    /// String value
    String,
    /// Single character
    Char,
    /// Declared or intrinsic function
    Function,
    /// Unifies with every type
    Any,
    /// Statements and ranges
    Void,
}

impl Type {
    /// `Any` unifies with everything; otherwise types unify only with
    /// themselves.
    pub fn unifies_with(&self, other: &Type) -> bool {
        matches!(self, Type::Any) || matches!(other, Type::Any) || self == other
    }

    /// Returns true if this type can appear in a numeric operation
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Number | Type::Any)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Number => "number",
            Type::String => "string",
            Type::Char => "char",
            Type::Function => "function",
            Type::Any => "any",
            Type::Void => "void",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display_lowercase() {
        assert_eq!(Type::Number.to_string(), "number");
        assert_eq!(Type::String.to_string(), "string");
        assert_eq!(Type::Char.to_string(), "char");
        assert_eq!(Type::Function.to_string(), "function");
        assert_eq!(Type::Any.to_string(), "any");
        assert_eq!(Type::Void.to_string(), "void");
    }

    #[test]
    fn test_any_unifies_with_everything() {
        for ty in [
            Type::Number,
            Type::String,
            Type::Char,
            Type::Function,
            Type::Any,
            Type::Void,
        ] {
            assert!(Type::Any.unifies_with(&ty));
            assert!(ty.unifies_with(&Type::Any));
        }
    }

    #[test]
    fn test_concrete_types_unify_only_with_themselves() {
        assert!(Type::Number.unifies_with(&Type::Number));
        assert!(!Type::Number.unifies_with(&Type::String));
        assert!(!Type::Char.unifies_with(&Type::Number));
    }

    #[test]
    fn test_is_numeric() {
        assert!(Type::Number.is_numeric());
        assert!(Type::Any.is_numeric());
        assert!(!Type::String.is_numeric());
    }
}
