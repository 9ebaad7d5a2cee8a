#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unsupported varnish version: {0:?} (only 3 and 4 are supported)")]
    UnsupportedVersion(String),

    #[error("invalid status line: {0:?}")]
    InvalidStatusLine(String),

    #[error("invalid auth challenge: expected {expected} bytes, actual {actual}")]
    InvalidChallenge { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CliError>;
