use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CliError, Result};
use crate::status::StatusCode;

/// Result of one command round trip: a status code and a text body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseFrame {
    pub status: StatusCode,
    pub body: String,
}

impl ResponseFrame {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Parse the response status line.
///
/// The wire format is `%-3d %-8d\n`: a 3-digit status code, a space, and
/// the body length left-justified in 8 columns. Parsed tolerantly as two
/// whitespace-separated fields.
pub fn parse_header(line: &str) -> Result<(StatusCode, usize)> {
    let line = line.trim_end_matches('\n').trim_end_matches('\r');
    let mut parts = line.split_whitespace();

    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| CliError::InvalidStatusLine(line.to_owned()))?;
    let length = parts
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| CliError::InvalidStatusLine(line.to_owned()))?;

    if parts.next().is_some() {
        return Err(CliError::InvalidStatusLine(line.to_owned()));
    }

    Ok((StatusCode(status), length))
}

static CHILD_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Child in state (\w+)").expect("valid pattern"));

/// Extract the cache child state from a `status` response body.
///
/// Returns the captured word from `Child in state <word>`, or `None`
/// when the body does not match.
pub fn parse_child_state(body: &str) -> Option<&str> {
    CHILD_STATE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Re-indent a response body for embedding in an error message,
/// prefixing every line with `" > "`.
pub fn indent_body(body: &str) -> String {
    body.lines()
        .map(|line| format!(" > {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
