//! HTML page rendering.
//!
//! Produces the single slideshow page from a frame selection. Two shapes:
//!
//! - **Viewer**: `<img id="viewer">` showing the first (oldest) frame, HUD
//!   pre-filled for frame 1, the frame list embedded as JSON, and the player
//!   script.
//! - **Placeholder**: "No images found" naming the directory that was
//!   searched. No image element, data block or script, so the player never
//!   starts.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into the page:
//! - `static/style.css`: layout (colors injected from config)
//! - `static/player.js`: preload and playback loop
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Interpolated text is escaped automatically; the JSON data block is escaped
//! by hand since it sits inside a raw `<script>` element.

use crate::config::{self, SiteConfig};
use crate::playback::{self, PlayerData};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/player.js");

/// Everything the page needs, already resolved.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub title: &'a str,
    /// Directory shown in the placeholder, e.g. `images`.
    pub images_dir: &'a str,
    /// Frame URLs, oldest first.
    pub frames: &'a [String],
    pub css: &'a str,
}

/// Full stylesheet: config colors followed by the static rules.
pub fn page_css(config: &SiteConfig) -> String {
    let color_css = config::generate_color_css(&config.colors);
    format!("{}\n\n{}", color_css, CSS_STATIC)
}

/// Render the page for `page.frames`.
pub fn render_page(page: &Page) -> Markup {
    let content = html! {
        div.wrap {
            h1 { (page.title) }
            div.frame {
                @if let Some(first) = page.frames.first() {
                    img id="viewer" src=(first) alt=(page.title);
                } @else {
                    (placeholder(page.images_dir))
                }
            }
            (hud(page.frames))
        }
        @if !page.frames.is_empty() {
            script id="skyloop-data" type="application/json" {
                (PreEscaped(player_data_json(page.frames)))
            }
            script { (PreEscaped(JS)) }
        }
    };

    base_document(page.title, page.css, content)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-phase="loading" {
                (content)
            }
        }
    }
}

fn placeholder(images_dir: &str) -> Markup {
    html! {
        div.empty {
            div.empty-title { "No images found" }
            div.small {
                "Looked under " code { (images_dir) "/" }
            }
        }
    }
}

/// Label and counter pills, seeded from the playback model for frame 1.
fn hud(frames: &[String]) -> Markup {
    let seeded = playback::Player::new(frames.to_vec()).map(|p| p.hud());
    html! {
        div.hud {
            @match &seeded {
                Some(hud) => {
                    div.pill id="label" { (hud.label) }
                    div.pill.small id="counter" { (hud.counter) }
                }
                None => {
                    div.pill id="label" { "Loading…" }
                    div.pill.small id="counter" {}
                }
            }
        }
    }
}

/// JSON for the data block, safe to place inside `<script>`.
fn player_data_json(frames: &[String]) -> String {
    let json = serde_json::to_string(&PlayerData::new(frames))
        .expect("frame list of strings always serializes");
    // A literal "</script" inside a file name would otherwise close the element
    json.replace("</", "<\\/")
}

// ============================================================================
// Tests
// ============================================================================
