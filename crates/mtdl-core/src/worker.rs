//! One worker: HTTP Range GET for a single chunk, written at the chunk's offset.
//!
//! The worker opens its own write handle, streams the response body into the
//! destination under the run's write lock, and reports the outcome through the
//! chunk's status. It never retries and never resumes a partial chunk.

use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::str;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::cancel::CancelContext;
use crate::curl_opts::CurlOptions;
use crate::error::DownloadError;
use crate::partition::{ChunkStatus, ChunkTask};
use crate::storage::ChunkWriter;

/// Why a single chunk did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// Curl reported an error (connection reset, DNS, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Final response status was not a success.
    #[error("HTTP {0}")]
    Http(u32),
    /// A ranged request was answered without `206 Partial Content`.
    #[error("server ignored the range request (HTTP {0})")]
    RangeIgnored(u32),
    /// Transfer ended before the chunk was complete.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Server sent more bytes than the chunk holds.
    #[error("server sent more than the {expected} bytes requested")]
    Overrun { expected: u64 },
    /// The OS accepted fewer bytes than handed to it.
    #[error("short write at offset {offset}: {written} of {len} bytes")]
    ShortWrite { offset: u64, written: usize, len: usize },
    /// Disk write or open failed.
    #[error("storage: {0}")]
    Storage(#[source] io::Error),
    /// The worker thread panicked.
    #[error("worker panicked: {0}")]
    Panicked(String),
    /// Another chunk failed first; this one stopped before writing further.
    #[error("cancelled after another chunk failed")]
    Cancelled,
}

impl ChunkError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChunkError::Cancelled)
    }

    /// Maps a chunk failure into the run-level taxonomy.
    pub fn into_download_error(self, index: usize, path: PathBuf) -> DownloadError {
        match self {
            ChunkError::Storage(source) => DownloadError::FileIo { path, source },
            e @ ChunkError::ShortWrite { .. } => DownloadError::FileIo {
                path,
                source: io::Error::new(io::ErrorKind::WriteZero, e.to_string()),
            },
            other => DownloadError::Transport {
                index,
                reason: other.to_string(),
            },
        }
    }
}

/// Progress notifications emitted by workers, in order per chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEvent {
    Started { index: usize, start: u64, end: u64 },
    Finished { index: usize, bytes: u64 },
    Failed { index: usize, reason: String, cancelled: bool },
}

/// Everything a worker needs besides its own chunk. Cloned once per worker;
/// the cancellation context is shared through the `Arc`.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub url: String,
    pub path: PathBuf,
    pub total_size: u64,
    pub curl: CurlOptions,
    pub cancel: Arc<CancelContext>,
    pub events: Option<Sender<ChunkEvent>>,
}

impl WorkerContext {
    fn emit(&self, event: ChunkEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// Runs one chunk to completion and records the outcome in `task.status`.
///
/// Any failure other than cancellation sets the run's fail-fast signal.
pub fn run_chunk(task: &mut ChunkTask, ctx: &WorkerContext) -> Result<(), ChunkError> {
    ctx.emit(ChunkEvent::Started {
        index: task.index,
        start: task.start,
        end: task.end,
    });

    let result = fetch(task, ctx);
    match &result {
        Ok(()) => {
            task.status = ChunkStatus::Success;
            tracing::debug!(index = task.index, bytes = task.len(), "chunk complete");
            ctx.emit(ChunkEvent::Finished {
                index: task.index,
                bytes: task.len(),
            });
        }
        Err(e) => {
            task.status = ChunkStatus::Failed;
            if !e.is_cancelled() && ctx.cancel.signal() {
                tracing::warn!(index = task.index, error = %e, "first chunk failure, cancelling run");
            } else {
                tracing::debug!(index = task.index, error = %e, "chunk failed");
            }
            ctx.emit(ChunkEvent::Failed {
                index: task.index,
                reason: e.to_string(),
                cancelled: e.is_cancelled(),
            });
        }
    }
    result
}

/// Status code of an `HTTP/x y reason` line.
fn status_code(line: &str) -> Option<u32> {
    if !line.get(..5)?.eq_ignore_ascii_case("http/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

fn fetch(task: &ChunkTask, ctx: &WorkerContext) -> Result<(), ChunkError> {
    if ctx.cancel.is_signaled() {
        return Err(ChunkError::Cancelled);
    }

    let writer = ChunkWriter::open(&ctx.path).map_err(ChunkError::Storage)?;
    let expected = task.len();
    // A chunk spanning the whole file is a plain GET; servers without range support answer 200.
    let ranged = !(task.start == 0 && expected == ctx.total_size);

    let mut easy = curl::easy::Easy::new();
    easy.url(&ctx.url)?;
    easy.fail_on_error(true)?;
    ctx.curl.apply(&mut easy)?;
    if ranged {
        easy.range(&task.curl_range())?;
    }

    let status: Cell<Option<u32>> = Cell::new(None);
    let mut received = 0u64;
    let mut failure: Option<ChunkError> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Some(code) = str::from_utf8(data).ok().and_then(status_code) {
                status.set(Some(code));
            }
            true
        })?;
        transfer.write_function(|data| {
            if ranged && status.get() != Some(206) {
                failure = Some(ChunkError::RangeIgnored(status.get().unwrap_or(0)));
                return Ok(0);
            }
            let len = data.len() as u64;
            if received + len > expected {
                failure = Some(ChunkError::Overrun { expected });
                return Ok(0);
            }
            let offset = task.start + received;
            match ctx.cancel.write_guarded(|| writer.write_at(offset, data)) {
                None => {
                    failure = Some(ChunkError::Cancelled);
                    Ok(0)
                }
                Some(Ok(n)) if n == data.len() => {
                    received += len;
                    Ok(n)
                }
                Some(Ok(n)) => {
                    failure = Some(ChunkError::ShortWrite {
                        offset,
                        written: n,
                        len: data.len(),
                    });
                    Ok(0)
                }
                Some(Err(e)) => {
                    failure = Some(ChunkError::Storage(e));
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if let Some(f) = failure {
            return Err(f);
        }
        if e.is_http_returned_error() {
            if let Ok(code) = easy.response_code() {
                return Err(ChunkError::Http(code));
            }
        }
        return Err(ChunkError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(ChunkError::Http(code));
    }
    if received != expected {
        return Err(ChunkError::PartialTransfer { expected, received });
    }
    Ok(())
}
