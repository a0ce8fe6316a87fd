// src/sync/digest.rs

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;
use tracing::debug;

/// Compute the blake3 digest of a byte buffer.
///
/// The digest is a fast equality proxy for file content: two files are
/// considered in sync iff their digests match. It is computed fresh on every
/// comparison; nothing is cached across calls.
pub fn digest_bytes(bytes: &[u8]) -> blake3::Hash {
    blake3::hash(bytes)
}

/// Compute the blake3 digest of a file's contents with a buffered read loop.
///
/// Returns the underlying `io::Error` unwrapped so callers can classify the
/// failure (missing source vs. unreadable destination) themselves.
pub fn compute_file_digest(path: &Path) -> io::Result<blake3::Hash> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let hash = hasher.finalize();
    debug!(path = ?path, hash = %hash.to_hex(), "computed file digest");
    Ok(hash)
}
