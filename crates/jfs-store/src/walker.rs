//! Directory walker shared by list, watch snapshots, and collection delete.

use std::fs;
use std::io;
use std::path::Path;

use jfs_types::{Key, Scope};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::codec::Codec;
use crate::error::{StoreError, StoreResult};
use crate::file::read_object;
use crate::layout::{Layout, OBJECT_SUFFIX};

/// Visit every object stored under `scope`, in filesystem traversal order.
///
/// Directories and files without the object suffix are skipped, as are
/// `.json` files that sit outside the `[namespace/]name.json` layout. A scope
/// whose directory does not exist is empty. An I/O error, a decode error, or
/// an error returned by `visit` aborts the walk. Returns the number of
/// objects visited.
///
/// Traversal order is whatever the filesystem yields; it is neither creation
/// nor name order.
pub fn walk<T, C, F>(layout: &Layout, codec: &C, scope: &Scope, mut visit: F) -> StoreResult<usize>
where
    C: Codec<T> + ?Sized,
    F: FnMut(&Path, Key, T) -> StoreResult<()>,
{
    let dir = layout.scope_dir(scope);
    match fs::metadata(&dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            let e = io::Error::new(io::ErrorKind::Other, "scope path is not a directory");
            return Err(StoreError::io("walk", &dir, e));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(StoreError::io("walk", &dir, e)),
    }

    let mut visited = 0;
    for entry in WalkDir::new(&dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
            StoreError::Io {
                op: "walk",
                path,
                source: io::Error::from(e),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_object = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(OBJECT_SUFFIX));
        if !is_object {
            continue;
        }
        let Some(key) = layout.key_for(path) else {
            warn!(path = %path.display(), "skipping file outside the object layout");
            continue;
        };
        if !scope.contains(&key) {
            continue;
        }
        let Some(object) = read_object(codec, path)? else {
            // Removed between the directory read and the file read.
            debug!(%key, "object vanished during walk");
            continue;
        };
        visit(path, key, object)?;
        visited += 1;
    }
    Ok(visited)
}
