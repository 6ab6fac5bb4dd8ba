//! CLI output formatting.
//!
//! Output is **information-first**: each frame leads with its playback
//! position, then the URL the page embeds. The `?v=` marker on each URL is the
//! file's modification time in seconds.
//!
//! ```text
//! Frames (2 of 48) from /srv/allsky/images
//! 001 images/20260101/a.jpg?v=1767300000
//! 002 images/20260101/b.jpg?v=1767300030
//! ```
//!
//! With nothing to play:
//!
//! ```text
//! No images found under /srv/allsky/images
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format the frame list the page would embed.
pub fn format_scan_output(frames: &[String], limit: usize, images_root: &Path) -> Vec<String> {
    if frames.is_empty() {
        return vec![format!("No images found under {}", images_root.display())];
    }

    let mut lines = Vec::with_capacity(frames.len() + 1);
    lines.push(format!(
        "Frames ({} of {}) from {}",
        frames.len(),
        limit,
        images_root.display()
    ));
    for (i, frame) in frames.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), frame));
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(frames: &[String], limit: usize, images_root: &Path) {
    for line in format_scan_output(frames, limit, images_root) {
        println!("{}", line);
    }
}
