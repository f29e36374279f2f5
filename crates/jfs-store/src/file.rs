//! Raw object-file I/O: read, atomic write, remove, directory creation.
//!
//! Object files are owner read/write only (0600) and directories owner-only
//! (0700). A write goes to a temporary file in the destination directory and
//! is renamed into place, so readers see either the old bytes or the new
//! bytes and a failed write leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::codec::Codec;
use crate::config::SyncMode;
use crate::error::{StoreError, StoreResult};

/// How an atomic write treats an existing file at the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Overwrite whatever is there.
    Replace,
    /// Fail with `AlreadyExists` if the destination exists.
    CreateNew,
}

/// Read and decode the object at `path`. `Ok(None)` if there is no file.
pub(crate) fn read_object<T, C>(codec: &C, path: &Path) -> StoreResult<Option<T>>
where
    C: Codec<T> + ?Sized,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io("read", path, e)),
    };
    codec
        .decode(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `bytes` to `path` through a temp file and a rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8], mode: WriteMode, sync: SyncMode) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "object path has no parent"))?;

    // NamedTempFile is created 0600 on unix.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    if sync == SyncMode::EveryWrite {
        tmp.as_file().sync_all()?;
    }

    match mode {
        WriteMode::Replace => tmp.persist(path).map_err(|e| e.error)?,
        WriteMode::CreateNew => tmp.persist_noclobber(path).map_err(|e| e.error)?,
    };

    if sync == SyncMode::EveryWrite {
        sync_dir(dir)?;
    }
    Ok(())
}

/// Create `dir` and any missing parents, owner-only.
pub(crate) fn ensure_dir(dir: &Path) -> StoreResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| StoreError::io("create directory", dir, e))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
