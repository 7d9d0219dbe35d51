//! Error types for catalogue-sync.

use thiserror::Error;

/// A network or I/O failure on one HTTP exchange: the status line never
/// arrived. Responses with error statuses are data, not transport errors.
#[derive(Debug, Clone, Error)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

/// All errors that can arise while obtaining credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response without the expected token field.
    #[error("token response is missing the '{field}' field")]
    MalformedResponse { field: &'static str },
}

/// Fatal errors that abort a synchronization run.
///
/// Per-item problems never appear here; they are collected as failed
/// outcomes on the run report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The identity credential could not be obtained; nothing else can
    /// proceed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}
