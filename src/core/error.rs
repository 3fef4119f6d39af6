//! Typed error handling for the directory API
//!
//! # Error Categories
//!
//! - [`StoreError`]: the external store could not answer a query
//! - [`ConfigError`]: configuration could not be loaded or is invalid
//! - [`ApiError`]: what a handler reports to the HTTP client
//!
//! Validation problems in query parameters are not errors: the boundary
//! parsers substitute defaults or drop the filter instead.
//!
//! Store failures reach the client as an opaque message. The internal cause
//! is only logged.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Errors raised by a [`ListingStore`](crate::core::store::ListingStore) backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never got a response (DNS, connect, timeout, ...)
    #[error("{backend} transport error: {message}")]
    Transport {
        backend: &'static str,
        message: String,
    },

    /// The store answered with a failure status
    #[error("{backend} returned status {status}: {message}")]
    Upstream {
        backend: &'static str,
        status: u16,
        message: String,
    },

    /// The store answered but the payload could not be decoded
    #[error("{backend} returned an undecodable response: {message}")]
    Decode {
        backend: &'static str,
        message: String,
    },

    /// A query failed inside the database
    #[error("{backend} query failed: {message}")]
    Query {
        backend: &'static str,
        message: String,
    },

    /// Shared in-memory state is unusable
    #[error("in-memory store lock poisoned: {0}")]
    Poisoned(String),
}

impl StoreError {
    /// Name of the backend that produced the error
    pub fn backend(&self) -> &'static str {
        match self {
            StoreError::Transport { backend, .. }
            | StoreError::Upstream { backend, .. }
            | StoreError::Decode { backend, .. }
            | StoreError::Query { backend, .. } => *backend,
            StoreError::Poisoned(_) => "memory",
        }
    }
}

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML or JSON for the expected shape
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// The configuration parsed but violates a constraint
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler returns to the client
#[derive(Debug)]
pub enum ApiError {
    /// Listing or lookup failed in the store
    Store {
        /// Plural resource name, e.g. `organizations`
        resource: &'static str,
        source: StoreError,
    },

    /// Detail lookup found nothing
    NotFound {
        /// Display name, e.g. `Speaker`
        entity: &'static str,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Store { resource, .. } => write!(f, "Failed to fetch {}", resource),
            ApiError::NotFound { entity } => write!(f, "{} not found", entity),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Store { source, .. } => Some(source),
            ApiError::NotFound { .. } => None,
        }
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Store { .. } => "STORE_ERROR",
            ApiError::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// Convert to an error response
    ///
    /// Only the display message is exposed; the store cause stays internal.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
