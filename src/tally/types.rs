use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// File count and byte total accumulated for one directory key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub file_count: u64,
    pub total_bytes: u64,
}

impl DirectoryStats {
    pub fn new(file_count: u64, total_bytes: u64) -> Self {
        Self {
            file_count,
            total_bytes,
        }
    }

    /// Account for one regular file of `len` bytes
    pub fn record_file(&mut self, len: u64) {
        self.file_count += 1;
        self.total_bytes = self.total_bytes.saturating_add(len);
    }

    /// Add another accumulator into this one
    pub fn absorb(&mut self, other: &DirectoryStats) {
        self.file_count += other.file_count;
        self.total_bytes = self.total_bytes.saturating_add(other.total_bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}

/// Directory key to statistics, sorted by key
pub type StatsMap = BTreeMap<String, DirectoryStats>;

/// How a directory is turned into a report key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Bare directory name; `a/build` and `b/build` share one key
    #[default]
    Name,
    /// Path relative to the scanned root, `/`-separated
    #[serde(alias = "relative_path")]
    #[value(alias = "relative-path")]
    Path,
}

impl KeyMode {
    /// Derive the key for `dir`, which must live under `root`
    pub fn key_for(&self, root: &Path, dir: &Path) -> String {
        match self {
            KeyMode::Name => dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.to_string_lossy().into_owned()),
            KeyMode::Path => {
                let relative = dir.strip_prefix(root).unwrap_or(dir);
                relative
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => Some(part.to_string_lossy()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            }
        }
    }
}

/// A directory whose listing stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFailure {
    #[serde(serialize_with = "serialize_lossy")]
    pub directory: PathBuf,
    pub message: String,
}

/// Output of one chunk worker
///
/// Never mutated once a worker returns it; the aggregator consumes it by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMap {
    pub directories: StatsMap,
    pub failures: Vec<ListingFailure>,
}

impl PartialMap {
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

/// Grand totals over the merged map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TallyTotals {
    pub files: u64,
    pub bytes: u64,
    /// Directories merged, counted per partial map key
    pub directories: u64,
}

/// Everything the reporter needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct TallyReport {
    #[serde(serialize_with = "serialize_lossy")]
    pub root: PathBuf,
    pub key_mode: KeyMode,
    pub directories: StatsMap,
    pub totals: TallyTotals,
    pub failures: Vec<ListingFailure>,
    pub workers: usize,
    pub entries: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl TallyReport {
    /// Directories with at least one regular file, in key order
    pub fn non_empty(&self) -> impl Iterator<Item = (&String, &DirectoryStats)> {
        self.directories.iter().filter(|(_, stats)| !stats.is_empty())
    }
}

/// Paths are not always UTF-8; JSON output replaces invalid bytes instead of failing
fn serialize_lossy<S: serde::Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_absorb() {
        let mut stats = DirectoryStats::default();
        stats.record_file(100);
        stats.record_file(23);
        assert_eq!(stats, DirectoryStats::new(2, 123));

        let mut other = DirectoryStats::new(1, 7);
        other.absorb(&stats);
        assert_eq!(other, DirectoryStats::new(3, 130));
    }

    #[test]
    fn test_key_by_name() {
        let root = Path::new("/data");
        assert_eq!(KeyMode::Name.key_for(root, Path::new("/data/a/build")), "build");
        assert_eq!(KeyMode::Name.key_for(root, Path::new("/data/b/build")), "build");
    }

    #[test]
    fn test_key_by_relative_path() {
        let root = Path::new("/data");
        assert_eq!(KeyMode::Path.key_for(root, Path::new("/data/a/build")), "a/build");
        assert_eq!(KeyMode::Path.key_for(root, Path::new("/data/b/build")), "b/build");
    }

    #[test]
    fn test_key_mode_deserializes_lowercase() {
        let mode: KeyMode = serde_json::from_str("\"path\"").unwrap();
        assert_eq!(mode, KeyMode::Path);
        let mode: KeyMode = serde_json::from_str("\"name\"").unwrap();
        assert_eq!(mode, KeyMode::Name);
    }

    #[test]
    fn test_report_skips_empty_directories() {
        let mut directories = StatsMap::new();
        directories.insert("full".to_string(), DirectoryStats::new(1, 10));
        directories.insert("empty".to_string(), DirectoryStats::default());

        let report = TallyReport {
            root: PathBuf::from("/data"),
            key_mode: KeyMode::Name,
            directories,
            totals: TallyTotals::default(),
            failures: Vec::new(),
            workers: 1,
            entries: 3,
            elapsed: Duration::from_millis(5),
        };

        let shown: Vec<_> = report.non_empty().map(|(key, _)| key.as_str()).collect();
        assert_eq!(shown, vec!["full"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["elapsed_ms"], 5);
        assert_eq!(json["key_mode"], "name");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_serialize_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/data").join(OsStr::from_bytes(b"bad\xffname"));
        let report = TallyReport {
            root: root.clone(),
            key_mode: KeyMode::Path,
            directories: StatsMap::new(),
            totals: TallyTotals::default(),
            failures: vec![ListingFailure {
                directory: root.join("locked"),
                message: "Permission denied".to_string(),
            }],
            workers: 1,
            entries: 1,
            elapsed: Duration::from_millis(1),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["root"], "/data/bad\u{FFFD}name");
        assert_eq!(json["failures"][0]["directory"], "/data/bad\u{FFFD}name/locked");
    }
}
