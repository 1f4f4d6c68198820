//! Spawns one worker thread per chunk, joins them all, and aggregates the outcome.

use std::io;
use std::thread::{Builder, JoinHandle};

use crate::error::DownloadError;
use crate::partition::{ChunkStatus, ChunkTask};
use crate::worker::{self, ChunkError, WorkerContext};

type WorkerResult = (ChunkTask, Result<(), ChunkError>);
type WorkerJob = Box<dyn FnOnce() -> WorkerResult + Send + 'static>;

/// Runs every chunk on its own OS thread and waits for all of them.
///
/// Returns the finished tasks (ordered by index) when every chunk succeeded.
/// If a thread cannot be started the fail-fast signal is raised, the workers
/// already running are joined, and `ThreadSpawn` is returned without starting
/// the remaining chunks.
pub fn run_chunks(tasks: Vec<ChunkTask>, ctx: &WorkerContext) -> Result<Vec<ChunkTask>, DownloadError> {
    run_chunks_with(tasks, ctx, |builder, job| builder.spawn(job))
}

/// `run_chunks` with the thread spawn call supplied by the caller.
fn run_chunks_with<S>(
    tasks: Vec<ChunkTask>,
    ctx: &WorkerContext,
    mut spawn: S,
) -> Result<Vec<ChunkTask>, DownloadError>
where
    S: FnMut(Builder, WorkerJob) -> io::Result<JoinHandle<WorkerResult>>,
{
    let total = tasks.len();
    let mut handles: Vec<(ChunkTask, JoinHandle<WorkerResult>)> = Vec::with_capacity(total);

    for task in tasks {
        let worker_ctx = ctx.clone();
        let builder = Builder::new().name(format!("chunk-{}", task.index));
        let spawned = spawn(
            builder,
            Box::new(move || {
                let mut task = task;
                let res = worker::run_chunk(&mut task, &worker_ctx);
                (task, res)
            }),
        );
        match spawned {
            Ok(handle) => handles.push((task, handle)),
            Err(source) => {
                ctx.cancel.signal();
                tracing::error!(index = task.index, error = %source, "failed to spawn worker");
                let _ = join_all(handles);
                return Err(DownloadError::ThreadSpawn {
                    index: task.index,
                    source,
                });
            }
        }
    }
    tracing::debug!(workers = total, "all workers started");

    aggregate(join_all(handles), ctx)
}

fn join_all(handles: Vec<(ChunkTask, JoinHandle<WorkerResult>)>) -> Vec<WorkerResult> {
    handles
        .into_iter()
        .map(|(task, handle)| {
            handle.join().unwrap_or_else(|e| {
                let mut task = task;
                task.status = ChunkStatus::Failed;
                let reason = e
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| e.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(index = task.index, %reason, "worker panicked");
                (task, Err(ChunkError::Panicked(reason)))
            })
        })
        .collect()
}

/// Success iff every chunk reports `Success`. A run where only one chunk failed
/// surfaces that chunk's own error; otherwise the first non-cancellation failure
/// by index is summarized in `ChunksFailed`.
fn aggregate(results: Vec<WorkerResult>, ctx: &WorkerContext) -> Result<Vec<ChunkTask>, DownloadError> {
    let total = results.len();
    let mut tasks = Vec::with_capacity(total);
    let mut failed = Vec::new();
    let mut first_cause: Option<(usize, ChunkError)> = None;
    let mut first_cancel: Option<(usize, ChunkError)> = None;

    for (task, res) in results {
        if task.status != ChunkStatus::Success {
            failed.push(task.index);
        }
        if let Err(e) = res {
            let slot = if e.is_cancelled() {
                &mut first_cancel
            } else {
                &mut first_cause
            };
            if slot.is_none() {
                *slot = Some((task.index, e));
            }
        }
        tasks.push(task);
    }

    if failed.is_empty() {
        return Ok(tasks);
    }

    ctx.cancel.signal();
    let (index, cause) = first_cause
        .or(first_cancel)
        .unwrap_or((failed[0], ChunkError::Cancelled));
    if failed.len() == 1 {
        return Err(cause.into_download_error(index, ctx.path.clone()));
    }
    Err(DownloadError::ChunksFailed {
        failed,
        total,
        first: format!("chunk {}: {}", index, cause),
    })
}
