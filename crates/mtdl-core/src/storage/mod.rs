//! Destination file lifecycle.
//!
//! The destination is created (or truncated) and sized to its final length
//! before any worker starts; each worker then opens its own positioned-write
//! handle on it.

mod builder;
mod writer;

pub use builder::preallocate;
pub use writer::ChunkWriter;
