use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

/// Hash algorithm name as it appears in the SARIF `hashes` map.
pub const SHA256: &str = "sha-256";

/// What a single read pass over a file produced.
///
/// Each field is independent: a file that fails halfway through still yields
/// the sample collected so far, but never a partial digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentScan {
    /// Hex-encoded SHA-256 of the full contents.
    pub sha256: Option<String>,

    /// Up to `sample_len` leading bytes.
    pub sample: Option<Vec<u8>>,
}

/// Stream `path` once through SHA-256 while keeping a bounded prefix sample.
///
/// Only regular files (after following symlinks) are read; devices, FIFOs
/// and sockets may never reach EOF or may block on open. Failures are logged
/// at debug level and reflected as `None` fields, never returned to the
/// caller.
pub fn scan(path: &Path, sample_len: usize) -> ContentScan {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(meta) => {
            debug!(
                path = %path.display(),
                file_type = ?meta.file_type(),
                "not a regular file, skipping content scan"
            );
            return ContentScan::default();
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping content scan");
            return ContentScan::default();
        }
    }

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping content scan");
            return ContentScan::default();
        }
    };

    let mut hasher = Sha256::new();
    let mut sample = Vec::with_capacity(sample_len.min(8192));
    let mut buf = [0u8; 8192];

    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let room = sample_len.saturating_sub(sample.len());
                sample.extend_from_slice(&buf[..n.min(room)]);
                hasher.update(&buf[..n]);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "could not calculate hash");
                return ContentScan {
                    sha256: None,
                    sample: (!sample.is_empty()).then_some(sample),
                };
            }
        }
    }

    ContentScan {
        sha256: Some(hex::encode(hasher.finalize())),
        sample: Some(sample),
    }
}
