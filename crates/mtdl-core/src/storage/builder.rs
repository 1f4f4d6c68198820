//! Creating and sizing the destination file.

use std::fs::File;
use std::path::Path;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

use crate::error::DownloadError;

/// Creates or truncates `path` and extends it to exactly `size` bytes.
///
/// On Unix tries `posix_fallocate` for real block allocation; falls back to
/// `set_len` when that fails (e.g. tmpfs or filesystems without support).
pub fn preallocate(path: &Path, size: u64) -> Result<(), DownloadError> {
    let file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| DownloadError::file_io(path, e))?;

    if !fallocate(&file, size) {
        file.set_len(size)
            .map_err(|e| DownloadError::file_io(path, e))?;
    }

    let len = file
        .metadata()
        .map_err(|e| DownloadError::file_io(path, e))?
        .len();
    if len != size {
        return Err(DownloadError::file_io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("preallocated {} bytes, expected {}", len, size),
            ),
        ));
    }
    tracing::debug!(path = %path.display(), size, "destination preallocated");
    Ok(())
}

#[cfg(unix)]
fn fallocate(file: &File, size: u64) -> bool {
    let Ok(len) = libc::off_t::try_from(size) else {
        return false;
    };
    let fd = file.as_raw_fd();
    let r = unsafe { libc::posix_fallocate(fd, 0, len) };
    if r != 0 {
        tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
    }
    r == 0
}

#[cfg(not(unix))]
fn fallocate(_file: &File, _size: u64) -> bool {
    false
}
