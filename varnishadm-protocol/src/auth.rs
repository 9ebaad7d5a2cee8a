//! Challenge/response authentication for the admin port.
//!
//! When varnishd is started with `-S secretfile`, the first frame after
//! connect is a 107 challenge whose body starts with a 32-byte nonce.
//! The client proves knowledge of the secret by replying
//! `auth <sha256-hex>` where the digest covers
//! `challenge NL secret challenge NL`.

use sha2::{Digest, Sha256};

use crate::error::{CliError, Result};

/// Length of the challenge nonce at the start of a 107 banner body.
pub const CHALLENGE_LEN: usize = 32;

/// Slice the challenge nonce out of a 107 banner body.
pub fn challenge_from_banner(banner: &str) -> Result<&str> {
    banner
        .get(..CHALLENGE_LEN)
        .ok_or(CliError::InvalidChallenge {
            expected: CHALLENGE_LEN,
            actual: banner.len(),
        })
}

/// Compute the hex digest to send back as `auth <hex>`.
///
/// `SHA-256(challenge + "\n" + secret + challenge + "\n")`, lowercase hex.
/// The secret is used exactly as configured; when it was read from a
/// secret file it typically carries its own trailing newline.
pub fn auth_response(challenge: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(b"\n");
    hasher.update(secret.as_bytes());
    hasher.update(challenge.as_bytes());
    hasher.update(b"\n");
    hex::encode(hasher.finalize())
}
