/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Error type shared by every layer of the client.
//!
//! All failures surface to callers as a single [`AppError`] carrying a
//! human-readable message. HTTP failures keep their status so callers can
//! branch on it when they need to.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum AppError {
    /// The JWT assertion could not be signed (malformed key or claims)
    #[error("signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Http {
        /// HTTP status returned by the server
        status: StatusCode,
        /// Server supplied message, or a generic fallback
        message: String,
    },

    /// No HTTP response was obtained (connection, DNS, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller supplied an invalid value
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure, e.g. while reading a key file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns the HTTP status for errors produced by a server response
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer token with 403
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
