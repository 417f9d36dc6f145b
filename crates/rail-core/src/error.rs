//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `rail-core`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A value could not be parsed (e.g. a time string that is not `HH:MM:SS`).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An entity with this id is already stored.
    #[error("duplicate id {0}")]
    DuplicateId(String),

    /// No entity with this id is stored.
    #[error("{0} not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rail-core`.
pub type CoreResult<T> = Result<T, CoreError>;
