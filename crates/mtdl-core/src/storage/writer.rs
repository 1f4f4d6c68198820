//! Positioned writes into the preallocated destination.

use std::fs::File;
use std::io;
use std::path::Path;
#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// One worker's write handle on the destination. Opened once per worker;
/// writes never move a shared cursor.
#[derive(Debug)]
pub struct ChunkWriter {
    file: File,
}

impl ChunkWriter {
    /// Opens the already-preallocated destination for writing (no truncation).
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::options().write(true).open(path)?;
        Ok(Self { file })
    }

    /// Writes `data` at `offset` with a single positioned write and returns the
    /// number of bytes the OS accepted. Callers treat a short count as failure.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<usize> {
        self.file.write_at(data, offset)
    }

    /// Seek + write fallback for non-Unix targets; only sound because every
    /// write of a run happens under the run's write lock.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<usize> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = &self.file;
        f.seek(SeekFrom::Start(offset))?;
        f.write(data)
    }
}
