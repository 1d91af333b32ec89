//! Error types for Funktion Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Malformed parse tree: {0}")]
    MalformedTree(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
