//! Error types and result aliases for liftoff.
//!
//! This module defines the shared error types used across all liftoff
//! components. Errors are structured for programmatic handling and include
//! context for debugging: the failing operation, the key or URL involved,
//! and the underlying cause where one exists.

use std::fmt;

/// The result type used throughout liftoff.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in liftoff operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external launch data API could not be reached or returned an
    /// unusable response (timeout, connection failure, non-2xx status, or a
    /// body that is not valid JSON).
    ///
    /// Fatal to the sync attempt that raised it; never retried internally.
    #[error("source unavailable at {url}: {message}")]
    Source {
        /// The URL the failing request was issued against.
        url: String,
        /// Description of the failure, including HTTP status and body where
        /// applicable.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A table backend operation failed (connectivity, throttling, or a
    /// malformed request).
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource_type} with id {id}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new source error for the given URL.
    #[must_use]
    pub fn source_unavailable(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new source error with an underlying cause.
    #[must_use]
    pub fn source_with_cause(
        url: impl Into<String>,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Source {
            url: url.into(),
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Creates a new storage error with the given message.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new storage error with a source cause.
    #[must_use]
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new resource not found error.
    #[must_use]
    pub fn resource_not_found(resource_type: &'static str, id: impl fmt::Display) -> Self {
        Self::ResourceNotFound {
            resource_type,
            id: id.to_string(),
        }
    }
}
