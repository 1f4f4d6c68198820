//! The immutable description of one run, built right after probing.

use crate::error::DownloadError;
use crate::partition::{self, ChunkTask};
use crate::probe::ProbeResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub url: String,
    pub total_size: u64,
    pub range_supported: bool,
    /// Effective worker count (after no-range collapse and the one-byte-per-worker cap).
    pub worker_count: usize,
}

impl DownloadPlan {
    pub fn new(url: &str, probe: ProbeResult, requested_workers: usize) -> Result<Self, DownloadError> {
        if requested_workers == 0 {
            return Err(DownloadError::InvalidRequest(
                "worker count must be at least 1".to_string(),
            ));
        }
        if probe.total_size == 0 {
            return Err(DownloadError::Size("total size is 0".to_string()));
        }
        let worker_count =
            partition::effective_workers(probe.total_size, requested_workers, probe.range_supported);
        if probe.range_supported && worker_count < requested_workers {
            tracing::warn!(
                requested = requested_workers,
                effective = worker_count,
                total_size = probe.total_size,
                "more workers than bytes; using one byte per worker"
            );
        }
        Ok(Self {
            url: url.to_string(),
            total_size: probe.total_size,
            range_supported: probe.range_supported,
            worker_count,
        })
    }

    /// True when the whole file is fetched by one worker.
    pub fn is_single(&self) -> bool {
        self.worker_count == 1
    }

    pub fn chunks(&self) -> Vec<ChunkTask> {
        partition::partition(self.total_size, self.worker_count, self.range_supported)
    }
}
