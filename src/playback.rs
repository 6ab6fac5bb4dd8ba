//! Playback engine model.
//!
//! The slideshow itself runs in the browser (`static/player.js`). This module
//! is the same state machine in Rust: the server uses it to seed the page
//! (first-frame HUD text, timing constants embedded for the script), and the
//! tick rules are unit tested here rather than in a browser.
//!
//! The shipped engine is the script, not [`Player`]. The two must stay in
//! sync: a change to settling, ticking or the HUD text here needs the same
//! change in `player.js`, and `tests/browser_player.rs` checks the script
//! against the behavior tested below.
//!
//! # State machine
//!
//! ```text
//!            every frame settled
//! Loading ───────────────────────▶ Playing ──┐
//!  (preload + decode all)            ▲       │ tick
//!                                    └───────┘
//! ```
//!
//! A frame is *settled* once its fetch/decode either succeeded or failed.
//! Only successfully decoded frames join the decoded set.
//!
//! # Tick
//!
//! Called once per display refresh with a monotonic timestamp:
//!
//! 1. The first tick only seeds the reference time.
//! 2. If less than one frame interval has passed since the reference, wait.
//! 3. Otherwise reset the reference to now and look at
//!    `(current + 1) % len`. Advance if that frame is decoded, hold if not.
//!
//! A frame that never decodes is never shown, and the loop holds on the frame
//! before it indefinitely.

use serde::Serialize;
use std::time::Duration;

/// Playback rate. Fixed at build time.
pub const FRAMES_PER_SECOND: u32 = 12;

/// `round(1000 / FRAMES_PER_SECOND)` milliseconds.
pub const FRAME_INTERVAL_MS: u64 = (1000 + FRAMES_PER_SECOND as u64 / 2) / FRAMES_PER_SECOND as u64;

pub fn frame_interval() -> Duration {
    Duration::from_millis(FRAME_INTERVAL_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Playing,
}

/// Outcome of preloading one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    Ready,
    Failed,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Preload still running; ticks are ignored.
    Loading,
    /// Less than one interval since the last reference point.
    Waiting,
    /// Moved to this index.
    Advanced(usize),
    /// Interval elapsed, but `candidate` is not decoded yet; index unchanged.
    Held { candidate: usize },
}

/// Status text shown under the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub label: String,
    pub counter: String,
}

/// Client-side playback state for one page view.
#[derive(Debug)]
pub struct Player {
    frames: Vec<String>,
    current: usize,
    settled: Vec<Option<Decode>>,
    phase: Phase,
    last_advance: Option<Duration>,
    interval: Duration,
}

impl Player {
    /// Start a player over `frames`. Returns `None` for an empty list: with no
    /// frames the engine never starts.
    pub fn new(frames: Vec<String>) -> Option<Self> {
        Self::with_interval(frames, frame_interval())
    }

    pub fn with_interval(frames: Vec<String>, interval: Duration) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        let settled = vec![None; frames.len()];
        Some(Self {
            frames,
            current: 0,
            settled,
            phase: Phase::Loading,
            last_advance: None,
            interval,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> &str {
        &self.frames[self.current]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: a player is never built over zero frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_decoded(&self, index: usize) -> bool {
        matches!(self.settled.get(index), Some(Some(Decode::Ready)))
    }

    /// Record the preload outcome for `index`.
    ///
    /// Each frame settles once; later reports are ignored. The player switches
    /// to [`Phase::Playing`] when the last outstanding frame settles.
    pub fn settle(&mut self, index: usize, outcome: Decode) {
        let Some(slot) = self.settled.get_mut(index) else {
            return;
        };
        if slot.is_none() {
            *slot = Some(outcome);
        }
        if self.phase == Phase::Loading && self.settled.iter().all(Option::is_some) {
            self.phase = Phase::Playing;
        }
    }

    /// Run one display-refresh callback at monotonic time `now`.
    pub fn tick(&mut self, now: Duration) -> Tick {
        if self.phase == Phase::Loading {
            return Tick::Loading;
        }
        let last = *self.last_advance.get_or_insert(now);
        if now.saturating_sub(last) < self.interval {
            return Tick::Waiting;
        }
        self.last_advance = Some(now);

        let candidate = (self.current + 1) % self.frames.len();
        if self.is_decoded(candidate) {
            self.current = candidate;
            Tick::Advanced(candidate)
        } else {
            Tick::Held { candidate }
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            label: short_label(self.current_frame()),
            counter: counter_text(self.current, self.frames.len()),
        }
    }
}

/// Last two path segments of a frame URL, query stripped and percent-decoded.
///
/// `images/20260101/night/a.jpg?v=9` → `night/a.jpg`
pub fn short_label(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let segments: Vec<&str> = path.split('/').collect();
    let tail = segments[segments.len().saturating_sub(2)..].join("/");
    urlencoding::decode(&tail)
        .map(|s| s.into_owned())
        .unwrap_or(tail)
}

/// `"3 / 48 · 12 fps"` for zero-based `index`.
pub fn counter_text(index: usize, len: usize) -> String {
    format!("{} / {} · {} fps", index + 1, len, FRAMES_PER_SECOND)
}

/// Data block embedded in the page for `player.js`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData<'a> {
    pub frames: &'a [String],
    pub fps: u32,
    pub frame_ms: u64,
}

impl<'a> PlayerData<'a> {
    pub fn new(frames: &'a [String]) -> Self {
        Self {
            frames,
            fps: FRAMES_PER_SECOND,
            frame_ms: FRAME_INTERVAL_MS,
        }
    }
}
