use std::path::{Path, PathBuf};

use super::fs::{ChildKind, DirectoryLister};
use super::types::{DirectoryStats, KeyMode, ListingFailure, PartialMap};

/// Summarize every directory found in one chunk of entries
///
/// Only directories in the chunk are looked at, and only their immediate
/// children are counted. Deeper levels are covered because the walk already
/// produced those deeper directories as entries of their own, in this chunk
/// or another one.
///
/// This never fails. A directory whose listing breaks keeps the counts it had
/// reached, the failure is recorded in the returned map, and the worker moves
/// on to the next entry.
pub fn summarize_chunk<L>(chunk: &[PathBuf], root: &Path, key_mode: KeyMode, lister: &L) -> PartialMap
where
    L: DirectoryLister + ?Sized,
{
    let mut partial = PartialMap::default();

    for entry in chunk {
        if !lister.is_directory(entry) {
            continue;
        }

        let key = key_mode.key_for(root, entry);
        let stats = partial.directories.entry(key.clone()).or_default();

        if let Err(message) = summarize_directory(entry, lister, stats) {
            tracing::warn!("Stopped listing {}: {}", entry.display(), message);
            partial.failures.push(ListingFailure {
                directory: entry.clone(),
                message,
            });
        }

        tracing::debug!(
            "{}: {} files {} bytes",
            key,
            stats.file_count,
            stats.total_bytes
        );
    }

    partial
}

/// Count the regular files directly inside `dir` into `stats`
///
/// Stops at the first error; everything recorded before it stays in `stats`.
fn summarize_directory<L>(dir: &Path, lister: &L, stats: &mut DirectoryStats) -> Result<(), String>
where
    L: DirectoryLister + ?Sized,
{
    let children = lister.children(dir).map_err(|e| e.to_string())?;

    for child in children {
        let child = child.map_err(|e| e.to_string())?;
        if let ChildKind::RegularFile { len } = child.kind {
            stats.record_file(len);
        }
    }

    Ok(())
}
