//! Error types for generated message operations

use thiserror::Error;

/// Returned by `deserialize` when the native engine rejects the input.
///
/// The message that `deserialize` was called on keeps its previous contents.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("failed to parse serialized message")]
pub struct ParseError;

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
