//! Image selection: which files make up the loop.
//!
//! Runs once per page request. Walks the image tree, keeps JPEG files, ranks
//! them by modification time, keeps the newest `limit`, and returns them
//! oldest-first so playback runs forward in time.
//!
//! ```text
//! images/                        mtime
//! ├── 20260101/
//! │   ├── a.jpg                  100
//! │   └── c.png                  200   ← not a JPEG, ignored
//! ├── b.jpeg                     300
//! └── d.JPG                      400
//!
//! select_recent(images/, 2)  →  [b.jpeg (300), d.JPG (400)]
//! ```
//!
//! ## Failure semantics
//!
//! Nothing here is fatal. A missing or unreadable root is the "no images yet"
//! state and yields an empty list. Entries that fail mid-walk (permission
//! denied, vanished between listing and stat) are skipped and logged.
//!
//! ## Determinism
//!
//! The walk is sorted by file name and the ranking sort is stable, so two scans
//! of an unchanged tree return the same list even when mtimes tie.

use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions (lowercase) that count as frames.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// One discovered image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Path relative to the image root, always `/`-separated.
    pub path: String,
    /// Last modification time in whole seconds since the Unix epoch.
    pub modified: u64,
}

impl ImageRecord {
    /// Relative path with the cache-busting marker appended: `b.jpeg?v=300`.
    pub fn cache_busted(&self) -> String {
        format!("{}?v={}", self.path, self.modified)
    }

    /// Fetchable URL under `prefix`, every segment of both percent-encoded.
    ///
    /// ```text
    /// prefix "all sky", path "night 1/a#2.jpg", modified 300
    ///   → all%20sky/night%201/a%232.jpg?v=300
    /// ```
    pub fn url(&self, prefix: &str) -> String {
        let path = encode_path(&self.path);
        if prefix.is_empty() {
            format!("{}?v={}", path, self.modified)
        } else {
            format!("{}/{}?v={}", encode_path(prefix), path, self.modified)
        }
    }
}

/// Percent-encode each `/`-separated segment, keeping the separators.
///
/// The server mounts the image route on the same encoding, so a URL built here
/// is exactly what the browser sends back.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Scan `root` and return the `limit` most recent images, oldest first.
///
/// A `limit` of 0 is treated as 1.
pub fn select_recent(root: &Path, limit: usize) -> Vec<ImageRecord> {
    let records = collect_images(root);
    let total = records.len();
    let selected = newest_oldest_first(records, limit);
    debug!(
        root = %root.display(),
        total,
        selected = selected.len(),
        "selected frames"
    );
    selected
}

/// Rank records newest-first, keep `limit`, then flip to oldest-first.
///
/// Pure: no filesystem access. Ties keep their input order.
pub fn newest_oldest_first(mut records: Vec<ImageRecord>, limit: usize) -> Vec<ImageRecord> {
    let limit = limit.max(1);
    records.sort_by(|a, b| b.modified.cmp(&a.modified));
    records.truncate(limit);
    records.reverse();
    records
}

/// Walk `root` recursively and record every JPEG with its mtime.
///
/// Returns an empty list when `root` is missing or not a directory.
pub fn collect_images(root: &Path) -> Vec<ImageRecord> {
    if !root.is_dir() {
        debug!(root = %root.display(), "image root missing, no images yet");
        return Vec::new();
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }
        let modified = match modified_secs(&entry) {
            Ok(secs) => secs,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "skipping file without mtime");
                continue;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        records.push(ImageRecord {
            path: web_path(rel),
            modified,
        });
    }
    records
}

/// Modification time in seconds. Pre-epoch timestamps clamp to 0.
fn modified_secs(entry: &walkdir::DirEntry) -> std::io::Result<u64> {
    let modified = entry.metadata()?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0))
}

/// Case-insensitive extension check against [`IMAGE_EXTENSIONS`].
pub fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Join path components with `/` regardless of the host separator.
fn web_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
