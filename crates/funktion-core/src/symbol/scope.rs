//! Lexical scopes
//!
//! An owned frame stack: `declare` writes the innermost frame only,
//! `resolve` walks the frames outward to the root. The root frame is
//! pre-seeded with the intrinsics and the primitive type names.

use super::entity::Entity;
use crate::types::Type;
use std::collections::HashMap;

/// Chain of lexical scopes; the root frame always exists
#[derive(Debug, Clone)]
pub struct Scope {
    root: HashMap<String, Entity>,
    frames: Vec<HashMap<String, Entity>>,
}

impl Scope {
    /// Root scope seeded with `print`, `input`, `step` and the primitive
    /// type names
    pub fn root() -> Self {
        let mut root = HashMap::new();
        for name in ["print", "input", "step"] {
            root.insert(name.to_string(), Entity::intrinsic(name));
        }
        for (name, ty) in [
            ("number", Type::Number),
            ("string", Type::String),
            ("char", Type::Char),
            ("function", Type::Function),
            ("any", Type::Any),
            ("void", Type::Void),
        ] {
            root.insert(name.to_string(), Entity::Primitive { ty });
        }
        Self {
            root,
            frames: Vec::new(),
        }
    }

    fn innermost(&self) -> &HashMap<String, Entity> {
        self.frames.last().unwrap_or(&self.root)
    }

    fn innermost_mut(&mut self) -> &mut HashMap<String, Entity> {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// Push a child frame (entering a function body)
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the innermost frame; the root frame is never popped
    pub fn exit(&mut self) {
        self.frames.pop();
    }

    /// Bind a name in the innermost frame; outer frames are untouched.
    /// Returns false when the innermost frame already binds the name.
    pub fn declare(&mut self, name: impl Into<String>, entity: Entity) -> bool {
        let name = name.into();
        let frame = self.innermost_mut();
        if frame.contains_key(&name) {
            return false;
        }
        frame.insert(name, entity);
        true
    }

    /// Rebind a name in the innermost frame unconditionally (installing the
    /// fully-typed function entity after its body is analyzed)
    pub fn rebind(&mut self, name: impl Into<String>, entity: Entity) {
        self.innermost_mut().insert(name.into(), entity);
    }

    /// Look a name up, walking frames outward to the root
    pub fn resolve(&self, name: &str) -> Option<&Entity> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .or_else(|| self.root.get(name))
    }

    /// Returns true when the innermost frame binds the name
    pub fn declared_locally(&self, name: &str) -> bool {
        self.innermost().contains_key(name)
    }

    /// True when the current scope has an enclosing function scope
    pub fn inside_function(&self) -> bool {
        !self.frames.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}
