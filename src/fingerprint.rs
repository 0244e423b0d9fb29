//! Evidence Fingerprinting
//!
//! SHA-256 content fingerprints used as resource identifiers for the
//! access control ledger and the custody log.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Length of a hex-encoded SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the lowercase hex SHA-256 digest of `content`.
pub fn compute_fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Fingerprint a byte stream without buffering it whole.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    debug!("Fingerprinted {} bytes", total);
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint the file at `path`.
pub fn fingerprint_file(path: impl AsRef<Path>) -> io::Result<String> {
    let file = File::open(path)?;
    fingerprint_reader(BufReader::new(file))
}

/// Re-hash `content` and compare it with a previously recorded fingerprint.
///
/// Hex case and surrounding whitespace in `expected` are ignored.
pub fn verify_fingerprint(content: &[u8], expected: &str) -> bool {
    matches_expected(&compute_fingerprint(content), expected)
}

/// Streaming variant of [`verify_fingerprint`].
pub fn verify_fingerprint_reader<R: Read>(reader: R, expected: &str) -> io::Result<bool> {
    let current = fingerprint_reader(reader)?;
    Ok(matches_expected(&current, expected))
}

fn matches_expected(current: &str, expected: &str) -> bool {
    let matches = current.eq_ignore_ascii_case(expected.trim());
    if !matches {
        warn!("Fingerprint mismatch: expected {}, current {}", expected.trim(), current);
    }
    matches
}

/// True if `value` has the shape of a fingerprint (64 lowercase hex chars).
pub fn is_fingerprint(value: &str) -> bool {
    value.len() == FINGERPRINT_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
