//! Filesystem access used by the directory summarizer
//!
//! Workers only ever ask two questions: "is this entry a directory?" and
//! "what are this directory's immediate children?". Keeping them behind
//! [`DirectoryLister`] lets the summarizer run against a real disk or against
//! a lister that fails part-way through a listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a child entry turned out to be after following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    RegularFile { len: u64 },
    Other,
}

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub path: PathBuf,
    pub kind: ChildKind,
}

/// Lazily produced children; each step may fail independently
pub type Children<'a> = Box<dyn Iterator<Item = io::Result<Child>> + 'a>;

/// Read-only view of the filesystem shared by all chunk workers
pub trait DirectoryLister: Sync {
    /// True when `path` resolves to a directory (symlinks are followed)
    fn is_directory(&self, path: &Path) -> bool;

    /// Open `dir` and yield its immediate children, one level deep
    fn children<'a>(&'a self, dir: &Path) -> io::Result<Children<'a>>;
}

/// The local disk through `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DirectoryLister for LocalFs {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn children<'a>(&'a self, dir: &Path) -> io::Result<Children<'a>> {
        let listing = fs::read_dir(dir)?;
        Ok(Box::new(listing.map(|entry| {
            let path = entry?.path();
            let kind = classify(&path)?;
            Ok(Child { path, kind })
        })))
    }
}

/// Follow symlinks, so a link to a file counts as a file
///
/// A dangling link is not a regular file and does not stop the listing.
fn classify(path: &Path) -> io::Result<ChildKind> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(ChildKind::RegularFile { len: metadata.len() }),
        Ok(_) => Ok(ChildKind::Other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // The link itself exists only when its target is what went missing
            fs::symlink_metadata(path).map(|_| ChildKind::Other).map_err(|_| e)
        }
        Err(e) => Err(e),
    }
}
