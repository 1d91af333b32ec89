//! Target-name hygiene
//!
//! Every user identifier is rewritten to `name_K` in the emitted program.
//! `K` is assigned on first use from a single monotonic counter shared by
//! all identifiers, so two distinct source names can never collide in the
//! target, and repeated uses of one name always rewrite the same way.

use std::collections::HashMap;

/// Per-entity numbering table for emitted identifiers
#[derive(Debug, Default)]
pub struct NameTable {
    assigned: HashMap<String, usize>,
}

impl NameTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Target name for a source identifier, assigning a number on first use
    pub fn target(&mut self, name: &str) -> String {
        let next = self.assigned.len() + 1;
        let number = *self.assigned.entry(name.to_string()).or_insert(next);
        format!("{name}_{number}")
    }
}
