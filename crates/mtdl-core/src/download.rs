//! End-to-end run: probe → plan → preallocate → workers → digest.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

use crate::cancel::CancelContext;
use crate::checksum;
use crate::config::MtdlConfig;
use crate::coordinator;
use crate::curl_opts::CurlOptions;
use crate::error::DownloadError;
use crate::partition::ChunkTask;
use crate::plan::DownloadPlan;
use crate::probe;
use crate::storage;
use crate::worker::{ChunkEvent, WorkerContext};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub path: PathBuf,
    pub plan: DownloadPlan,
    pub chunks: Vec<ChunkTask>,
    /// Lowercase hex SHA-256 of the assembled file.
    pub sha256: String,
}

/// Probes `url` and builds the plan for `requested_workers`. Nothing is written.
pub fn plan(url: &str, requested_workers: usize, cfg: &MtdlConfig) -> Result<DownloadPlan, DownloadError> {
    if url.trim().is_empty() {
        return Err(DownloadError::InvalidRequest("URL is empty".to_string()));
    }
    if requested_workers == 0 {
        return Err(DownloadError::InvalidRequest(
            "worker count must be at least 1".to_string(),
        ));
    }
    let probed = probe::probe(url, &CurlOptions::per_handle(cfg, 1))?;
    let plan = DownloadPlan::new(url, probed, requested_workers)?;
    tracing::info!(
        url,
        total_size = plan.total_size,
        range_supported = plan.range_supported,
        workers = plan.worker_count,
        "download planned"
    );
    Ok(plan)
}

/// Executes `plan` into `path`: sizes the file, runs one worker per chunk, and
/// hashes the result once every chunk succeeded.
///
/// `events`, when given, receives every worker's start/finish/failure; the
/// sender is dropped before this returns.
pub fn execute(
    plan: &DownloadPlan,
    path: &Path,
    cfg: &MtdlConfig,
    events: Option<Sender<ChunkEvent>>,
) -> Result<DownloadReport, DownloadError> {
    let started = Instant::now();
    let tasks = plan.chunks();
    storage::preallocate(path, plan.total_size)?;

    let ctx = WorkerContext {
        url: plan.url.clone(),
        path: path.to_path_buf(),
        total_size: plan.total_size,
        curl: CurlOptions::per_handle(cfg, tasks.len()),
        cancel: Arc::new(CancelContext::new()),
        events,
    };
    let result = coordinator::run_chunks(tasks, &ctx);
    drop(ctx);
    let chunks = result?;

    let len = std::fs::metadata(path)
        .map_err(|e| DownloadError::file_io(path, e))?
        .len();
    if len != plan.total_size {
        return Err(DownloadError::file_io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("file is {} bytes, expected {}", len, plan.total_size),
            ),
        ));
    }

    let sha256 = checksum::sha256_path(path)?;
    tracing::info!(
        path = %path.display(),
        bytes = plan.total_size,
        elapsed_ms = started.elapsed().as_millis() as u64,
        %sha256,
        "download complete"
    );
    Ok(DownloadReport {
        path: path.to_path_buf(),
        plan: plan.clone(),
        chunks,
        sha256,
    })
}

/// `plan` followed by `execute`.
pub fn run_download(
    url: &str,
    path: &Path,
    requested_workers: usize,
    cfg: &MtdlConfig,
    events: Option<Sender<ChunkEvent>>,
) -> Result<DownloadReport, DownloadError> {
    let plan = plan(url, requested_workers, cfg)?;
    execute(&plan, path, cfg, events)
}
