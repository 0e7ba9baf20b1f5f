//! Error types for code generation

use thiserror::Error;

/// Result type alias for generator operations
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Error type for generator operations
///
/// Unsupported schema shapes are not errors; they are skipped and reported
/// as diagnostics. These variants stop generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Two distinct entry points were assigned the same symbol name
    #[error("entry point name collision: `{name}` is claimed by {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A message, field or oneof name appears twice where it must be unique
    #[error("duplicate {kind} `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    /// Schema input is malformed
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A template referenced an unknown variable or was malformed
    #[error("template error: {0}")]
    Template(String),

    /// Generator options could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
