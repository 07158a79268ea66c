// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Krishi Officer service.

use thiserror::Error;

/// The primary error type used across adapter traits and the query pipeline.
#[derive(Debug, Error)]
pub enum KrishiError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Language model provider errors (transport failure, non-2xx status, bad body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fault inside the lexical translator.
    #[error("translation error: {0}")]
    Translation(String),

    /// Rejected client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A state transition was attempted on a record that no longer allows it.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KrishiError {
    /// Wraps any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        KrishiError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true when the error is a not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KrishiError::NotFound { .. })
    }
}
