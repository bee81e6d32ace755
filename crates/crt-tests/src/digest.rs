//! SHA256 helpers for comparing encoded output between runs.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex digest of a file's bytes.
pub fn file_sha256(path: &Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    hex(&Sha256::digest(&bytes))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
