//! Source locations for diagnostics
//!
//! Every diagnostic the analyzer raises is prefixed with the responsible
//! token's location, rendered as `Line L, col C: `.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line/column position of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLoc {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub col: usize,
}

impl SourceLoc {
    /// Create a new source location
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Default for SourceLoc {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, col {}: ", self.line, self.col)
    }
}
