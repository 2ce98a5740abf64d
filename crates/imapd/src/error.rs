//! Error types for the IMAP server.

use std::time::Duration;

use thiserror::Error;

/// Errors that end a session or stop the listener.
///
/// Problems a client can recover from (unknown commands, bad arguments,
/// missing mailboxes) never surface as an `Error`: they are answered with a
/// tagged `BAD` or `NO` response and the session continues.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error during network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake failed (STARTTLS or implicit TLS).
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),

    /// A read or write did not complete within the configured deadline.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The client sent a line that cannot be framed as a command.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A response value cannot be represented on the wire.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Invalid state for the requested operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The server configuration does not support the requested operation.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
