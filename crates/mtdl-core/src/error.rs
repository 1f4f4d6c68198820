//! Error taxonomy for a download run.
//!
//! Every variant is fatal to the run; nothing here is retried.

use std::path::PathBuf;

/// Fatal error for one download run.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Metadata (HEAD) request failed or returned a non-2xx status.
    #[error("probe failed for {url}: {reason}")]
    Probe { url: String, reason: String },

    /// Server did not report a usable positive size.
    #[error("invalid remote size: {0}")]
    Size(String),

    /// Destination file could not be created, extended, written or read.
    #[error("file I/O on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A chunk's range request failed.
    #[error("chunk {index} transfer failed: {reason}")]
    Transport { index: usize, reason: String },

    /// A worker thread could not be started.
    #[error("failed to spawn worker {index}: {source}")]
    ThreadSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// At least one chunk did not complete; `first` describes the earliest failure by index.
    #[error("{} of {total} chunks failed (chunks {failed:?}); first: {first}", .failed.len())]
    ChunksFailed {
        failed: Vec<usize>,
        total: usize,
        first: String,
    },

    /// Caller handed the library a request it cannot plan (empty URL, zero workers).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DownloadError {
    pub(crate) fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::FileIo {
            path: path.into(),
            source,
        }
    }
}
