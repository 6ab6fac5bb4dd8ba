//! Shared test utilities for the skyloop test suite.
//!
//! Builds throwaway image trees with pinned modification times, so selection
//! order can be asserted without sleeping between writes.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = image_tree(&[("a.jpg", 100), ("night/b.jpg", 200)]);
//! let selected = select_recent(tmp.path(), 48);
//! assert_eq!(selected.len(), 2);
//! ```

use filetime::{FileTime, set_file_mtime};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding `files`, each `(relative path, mtime secs)`.
///
/// Contents are placeholder bytes; selection only looks at names and mtimes.
pub fn image_tree(files: &[(&str, i64)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, mtime) in files {
        write_file(tmp.path(), rel, *mtime);
    }
    tmp
}

/// Write one placeholder file below `root` and pin its mtime.
pub fn write_file(root: &Path, rel: &str, mtime: i64) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"fake image").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

// =========================================================================
// HTML assertions
// =========================================================================

/// Count occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
