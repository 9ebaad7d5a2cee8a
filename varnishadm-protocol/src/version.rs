use crate::error::{CliError, Result};

/// Major Varnish version, selecting the command vocabulary.
///
/// The two supported vocabularies differ only in the purge-by-URL
/// command literal; see [`Command`](crate::Command).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    V3,
    V4,
}

impl ProtocolVersion {
    /// Select a version from a caller-supplied version string.
    ///
    /// The leading integer of the string decides: `"3"`, `"3.0.5"` → V3,
    /// `"4"`, `"4.1"` → V4. An empty string or one with no leading digits
    /// falls back to V3. Any other major number is rejected.
    pub fn from_version_str(s: &str) -> Result<Self> {
        let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Ok(Self::V3);
        }
        match digits.parse::<u32>() {
            Ok(3) => Ok(Self::V3),
            Ok(4) => Ok(Self::V4),
            _ => Err(CliError::UnsupportedVersion(s.to_owned())),
        }
    }

    /// Returns the version name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3 => "3",
            Self::V4 => "4",
        }
    }
}
