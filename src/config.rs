//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` placed in the site root (the directory
//! passed as `--root`, which is also where the image tree lives by default).
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Optional, overrides stock defaults
//! └── images/                  # Image tree scanned on every page load
//!     ├── 20260101/
//!     │   ├── image_20260101_210000.jpg
//!     │   └── image_20260101_210030.jpg
//!     └── latest.jpg
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_dir = ""             # Empty = directory holding config.toml
//! images_dir = "images"     # Image tree under base_dir, also the URL prefix
//! frames = 48               # Frames in the loop (values below 1 become 1)
//! title = "All-Sky Camera (Live)"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [colors]
//! background = "#666666"
//! panel = "#444444"         # Frame panel behind the viewer
//! text = "#ffffff"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! frames = 96
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory containing the image tree. Empty means the site root.
    pub base_dir: String,
    /// Image tree below `base_dir`. Doubles as the URL prefix frames are served under.
    pub images_dir: String,
    /// How many of the most recent images to loop. Coerced to at least 1.
    pub frames: i64,
    /// Page title and heading.
    pub title: String,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Page colors.
    pub colors: ColorConfig,
}

pub const DEFAULT_FRAMES: i64 = 48;

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_dir: String::new(),
            images_dir: "images".to_string(),
            frames: DEFAULT_FRAMES,
            title: "All-Sky Camera (Live)".to_string(),
            server: ServerConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// `frames` is not checked here: non-positive values are
    /// coerced by [`effective_frames`] instead of rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let images_dir = self.images_dir.trim_matches(['/', '\\']);
        if images_dir.is_empty() {
            return Err(ConfigError::Validation(
                "images_dir must not be empty".into(),
            ));
        }
        let escapes = Path::new(images_dir)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(ConfigError::Validation(
                "images_dir must be a relative path without '..'".into(),
            ));
        }
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }

    /// Absolute location of the image tree.
    ///
    /// `site_root` is the directory the config was loaded from; it stands in
    /// for `base_dir` when that is left empty.
    pub fn images_root(&self, site_root: &Path) -> PathBuf {
        let base = self.base_dir.trim();
        let base = if base.is_empty() {
            site_root.to_path_buf()
        } else {
            PathBuf::from(base)
        };
        base.join(self.url_prefix())
    }

    /// `images_dir` as a URL path prefix: forward slashes, no leading or trailing slash.
    pub fn url_prefix(&self) -> String {
        self.images_dir
            .replace('\\', "/")
            .trim_matches('/')
            .to_string()
    }
}

/// Resolve the number of frames to loop.
///
/// Anything below 1 (including a negative value in the config file) becomes 1.
pub fn effective_frames(config: &SiteConfig) -> usize {
    usize::try_from(config.frames.max(1)).unwrap_or(usize::MAX)
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the page is served on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Page colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Panel behind the viewer and the "no images" notice.
    pub panel: String,
    /// Heading and HUD text.
    pub text: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#666666".to_string(),
            panel: "#444444".to_string(),
            text: "#ffffff".to_string(),
        }
    }
}

// =============================================================================
// Layering: stock defaults, then the site's config.toml
// =============================================================================
//
// skyloop reads at most one file. The stock defaults become a TOML table, the
// site file's table is laid over it, and only the merged table is
// deserialized, so a sparse file never repeats a whole section to change one
// key.

/// Stock defaults as a TOML table, the bottom layer of every load.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Lay `overlay` over `base`.
///
/// Sections merge key by key, so `[colors] panel = ".."` keeps the stock
/// `background` and `text`. Any other overlay value replaces what it covers.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, replacement) => replacement,
    }
}

/// Read `<site_root>/config.toml` without interpreting it.
///
/// A site without the file is valid and yields `None`; a file that is not
/// TOML is an error.
pub fn load_raw_config(site_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = site_root.join("config.toml");
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Turn the layered table into a checked [`SiteConfig`].
///
/// Typos surface here as unknown-field errors; bad paths and bind addresses
/// as [`ConfigError::Validation`].
pub fn resolve_config(
    defaults: toml::Value,
    site_file: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let layered = match site_file {
        Some(file) => merge_toml(defaults, file),
        None => defaults,
    };
    let config: SiteConfig = layered.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Configuration for the site rooted at `site_root` (the `--root` directory).
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(site_root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# skyloop configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the site root (the directory passed as --root).
# Unknown keys will cause an error.

# Directory that contains the image tree.
# Leave empty to use the site root itself.
base_dir = ""

# Image tree below base_dir. Every .jpg/.jpeg file anywhere under it is a
# candidate frame. Also used as the URL prefix the images are served under.
images_dir = "images"

# Number of most recent images to loop, oldest first.
# Values below 1 are treated as 1.
frames = 48

# Page title and heading.
title = "All-Sky Camera (Live)"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
# Address to listen on. Can be overridden with `skyloop serve --bind`.
bind = "127.0.0.1:8080"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#666666"
panel = "#444444"         # Panel behind the viewer
text = "#ffffff"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --bg: {background};
    --panel: {panel};
    --text: {text};
}}"#,
        background = colors.background,
        panel = colors.panel,
        text = colors.text,
    )
}
