use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Walk `root` once and return every entry below it, files and directories alike
///
/// The walk runs on the calling thread so the order is the walker's own
/// depth-first order. Every ignore rule the walker knows about (hidden files,
/// `.gitignore`, `.ignore`) is switched off: this is a disk usage count, not a
/// source scan. Symlinks are listed but not descended into. The root itself
/// is not part of the result.
///
/// Walk errors are logged and skipped. A subdirectory that cannot be opened
/// is still returned, because its parent listed it; the summarizer will hit
/// the same error and record it.
pub fn collect_entries(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.depth() == 0 {
                    continue;
                }
                entries.push(entry.into_path());
            }
            Err(e) => {
                tracing::warn!("Walk error under {}: {}", root.display(), e);
            }
        }
    }

    tracing::debug!("Collected {} entries under {}", entries.len(), root.display());
    entries
}
