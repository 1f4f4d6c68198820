//! SHA-256 integrity digest of the assembled file.
//!
//! Computed once after every chunk succeeded. The digest is reported, never
//! compared against an expected value.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DownloadError;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads sequentially in fixed blocks so memory use does not grow with file size.
pub fn sha256_path(path: &Path) -> Result<String, DownloadError> {
    let mut f = File::open(path).map_err(|e| DownloadError::file_io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .map_err(|e| DownloadError::file_io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
