//! Parse-tree contract consumed by the analyzer
//!
//! The surface grammar and its recognizer live outside this repo; what the
//! analyzer requires of them is captured here: one node per grammar
//! production, per-production child access, a raw source-text view, and a
//! source location for diagnostics.
//!
//! Child layout per production:
//! - `Program`: optional `GlobalRange` first, then statements
//! - `FuncDef`: name `Identifier`, param `Identifier`, body
//! - `FuncCall`: name `Identifier`, argument
//! - `Expr`: first expression, then the rest of the sequence
//! - `SliceExpr`: the parallel sub-expressions in order
//! - `CondExpr`: left, operator `Token`, right, then-branch, else-branch
//! - `BitwiseExpr` / `ShiftExpr` / `AddExpr` / `MulExpr`: left, operator
//!   `Token`, right
//! - `Factor`: base, `**` `Token`, exponent; or unary `Token`, operand
//! - `Primary`: the parenthesized inner expression
//! - `PrintStmt` / `InputStmt` / `Timestep`: single child
//! - `StepCall`: function `Identifier`, argument `Identifier`, optional
//!   iteration-count `Number`
//! - `TimeCall`: target, count
//! - `GlobalRange`: `NumRange` or `CharRange`, optional `Timestep`
//! - `NumRange` / `CharRange`: start literal, optional end literal
//! - leaves (`Number`, `StringLiteral`, `CharLiteral`, `Identifier`,
//!   `Token`): raw text only

use crate::error::{CoreError, Result};
use crate::loc::SourceLoc;
use serde::{Deserialize, Serialize};

/// Grammar production of a parse-tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxKind {
    Program,
    FuncDef,
    FuncCall,
    Expr,
    SliceExpr,
    CondExpr,
    BitwiseExpr,
    ShiftExpr,
    AddExpr,
    MulExpr,
    Factor,
    Primary,
    PrintStmt,
    StepCall,
    InputStmt,
    TimeCall,
    GlobalRange,
    NumRange,
    CharRange,
    Timestep,
    Number,
    StringLiteral,
    CharLiteral,
    Identifier,
    /// Operator or punctuation token
    Token,
}

/// One node of the parse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    /// Grammar production this node was built from
    pub kind: SyntaxKind,
    /// Raw source text covered by the node (literal text for leaves)
    pub text: String,
    /// Location of the node's first token
    pub loc: SourceLoc,
    /// Children in grammar-role order
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// Create a leafless node
    pub fn new(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            loc: SourceLoc::default(),
            children: Vec::new(),
        }
    }

    /// Attach children in grammar-role order
    pub fn with_children(mut self, children: Vec<ParseNode>) -> Self {
        self.children = children;
        self
    }

    /// Attach a source location
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.loc = SourceLoc::new(line, col);
        self
    }

    /// Child at a grammar-role position
    pub fn child(&self, index: usize) -> Option<&ParseNode> {
        self.children.get(index)
    }

    /// Raw source text of the node
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric value of a `Number` leaf
    pub fn number_value(&self) -> Result<f64> {
        self.text
            .parse()
            .map_err(|_| CoreError::InvalidLiteral(self.text.clone()))
    }

    /// Character value of a `CharLiteral` leaf
    pub fn char_value(&self) -> Result<char> {
        self.text
            .chars()
            .next()
            .ok_or_else(|| CoreError::InvalidLiteral(self.text.clone()))
    }

    /// Identifier leaf
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(SyntaxKind::Identifier, name)
    }

    /// Number literal leaf; text is the raw literal (`-5`, `1.5`)
    pub fn number(text: impl Into<String>) -> Self {
        Self::new(SyntaxKind::Number, text)
    }

    /// String literal leaf; text is the unquoted contents
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(SyntaxKind::StringLiteral, text)
    }

    /// Char literal leaf
    pub fn char_lit(text: impl Into<String>) -> Self {
        Self::new(SyntaxKind::CharLiteral, text)
    }

    /// Operator token leaf
    pub fn token(symbol: impl Into<String>) -> Self {
        Self::new(SyntaxKind::Token, symbol)
    }
}
