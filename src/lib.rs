//! # Skyloop
//!
//! A live slideshow for an all-sky camera. The camera drops JPEGs into a
//! directory tree; skyloop serves one page that plays the most recent frames
//! as a loop, oldest to newest.
//!
//! # Architecture: Two Halves
//!
//! ```text
//! 1. Select   images/  →  frame URLs     (server, on every page request)
//! 2. Play     frame URLs  →  animation   (browser, preload then 12 fps loop)
//! ```
//!
//! The server never caches a selection. Every reload walks the image tree
//! again, so new frames show up as soon as the camera writes them. Each URL
//! carries a `?v=<mtime>` marker, so a file rewritten in place gets a new URL
//! and the browser fetches it again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`select`] | Walks the image tree and picks the newest N JPEGs, returned oldest first |
//! | [`playback`] | Frame-advance model: fixed interval, only onto decoded frames |
//! | [`render`] | Renders the page (viewer or "No images found" placeholder) using Maud |
//! | [`server`] | axum router: the page route plus read-only image serving |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting for the `scan` command |
//!
//! # Design Decisions
//!
//! ## Playback Only Advances Onto Decoded Frames
//!
//! The browser preloads and decodes every frame before the loop starts. A
//! tick whose next frame never decoded holds the current frame instead of
//! flashing a broken image. The model in [`playback`] describes the same rules
//! the embedded player script follows, and seeds the first HUD state of the
//! rendered page.
//!
//! ## Single Page, Inlined Assets
//!
//! CSS and JavaScript are compiled into the binary and inlined into the page.
//! The only other URLs are the images themselves.

pub mod config;
pub mod output;
pub mod playback;
pub mod render;
pub mod select;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
