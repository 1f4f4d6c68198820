//! Chunk type and range partitioning.

/// Lifecycle of one chunk. Only the owning worker moves it out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// A single chunk: closed byte range [start, end] of the remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTask {
    pub index: usize,
    /// First byte (inclusive).
    pub start: u64,
    /// Last byte (inclusive).
    pub end: u64,
    pub status: ChunkStatus,
}

impl ChunkTask {
    pub fn new(index: usize, start: u64, end: u64) -> Self {
        Self {
            index,
            start,
            end,
            status: ChunkStatus::Pending,
        }
    }

    /// Length of this chunk in bytes (never 0 for partitioner output).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// curl `CURLOPT_RANGE` value: `start-end` without the `bytes=` prefix.
    pub fn curl_range(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

/// Worker count actually used for `total_size` bytes: never more workers than bytes,
/// and a single worker when ranges are unsupported.
pub fn effective_workers(total_size: u64, requested: usize, range_supported: bool) -> usize {
    if !range_supported || requested <= 1 {
        return 1;
    }
    if requested as u64 > total_size {
        // total_size < requested, so it fits in usize.
        return total_size as usize;
    }
    requested
}

/// Splits `[0, total_size)` into ordered, contiguous, non-empty chunks.
///
/// Every chunk but the last has `total_size / n` bytes; the last one absorbs the
/// remainder. With no range support or one worker the whole file is one chunk.
/// A request for more workers than bytes degrades to one byte per chunk.
/// Returns an empty vec if `total_size` or `worker_count` is 0.
pub fn partition(total_size: u64, worker_count: usize, range_supported: bool) -> Vec<ChunkTask> {
    if total_size == 0 || worker_count == 0 {
        return Vec::new();
    }

    let n = effective_workers(total_size, worker_count, range_supported);
    if n == 1 {
        return vec![ChunkTask::new(0, 0, total_size - 1)];
    }

    let chunk = total_size / n as u64;
    (0..n)
        .map(|i| {
            let start = i as u64 * chunk;
            let end = if i == n - 1 {
                total_size - 1
            } else {
                (i as u64 + 1) * chunk - 1
            };
            ChunkTask::new(i, start, end)
        })
        .collect()
}
