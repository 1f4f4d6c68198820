//! Multi-threaded HTTP range downloader engine.
//!
//! Probes a URL for size and range support, splits it into contiguous chunks,
//! fetches every chunk on its own thread straight into a preallocated file, and
//! reports the SHA-256 of the result.

pub mod config;
pub mod curl_opts;
pub mod error;
pub mod logging;

pub mod cancel;
pub mod checksum;
pub mod coordinator;
pub mod download;
pub mod partition;
pub mod plan;
pub mod probe;
pub mod storage;
pub mod url_model;
pub mod worker;

pub use download::{execute, plan, run_download, DownloadReport};
pub use error::DownloadError;
pub use partition::{ChunkStatus, ChunkTask};
pub use plan::DownloadPlan;
pub use worker::ChunkEvent;
