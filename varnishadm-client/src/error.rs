use std::time::Duration;

use varnishadm_rs_protocol::StatusCode;

/// Errors that can occur during admin client operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// TCP or socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Admin protocol error (unsupported version, malformed status line, etc.).
    #[error("protocol error: {0}")]
    Protocol(#[from] varnishadm_rs_protocol::CliError),

    /// Operation exceeded the configured timeout duration.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// Server closed the connection (read returned 0 bytes).
    #[error("disconnected")]
    Disconnected,

    /// Operation attempted without a live session; call `connect` first.
    #[error("not connected")]
    NotConnected,

    /// Server demanded authentication (status 107) but no secret is configured.
    #[error("authentication required but no secret configured")]
    AuthRequired,

    /// The challenge/response exchange failed. The cause is deliberately
    /// not carried here; it is logged at debug level before the collapse.
    #[error("authentication failed")]
    AuthFailed,

    /// Post-handshake banner status was not 200.
    #[error("bad banner from {addr}: status {status}")]
    BadBanner { addr: String, status: StatusCode },

    /// A command's response status did not match the expected code.
    /// The body is re-indented for readability; the session remains usable.
    #[error("command {command:?} returned {status}:\n{body}")]
    CommandFailed {
        command: String,
        status: StatusCode,
        body: String,
    },
}

/// Convenience alias for `Result<T, AdminError>`.
pub type Result<T> = std::result::Result<T, AdminError>;
