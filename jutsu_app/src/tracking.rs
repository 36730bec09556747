//! Frame capture and hand tracking collaborators.
//!
//! The engine only needs, per tick, a frame and a classified label.  Where
//! they come from is hidden behind [`FrameSource`] and [`HandTracker`]:
//!
//! * [`SimCamera`] — synthetic frames (optionally a fixed number of them).
//! * [`SimHandTracker`] — finger states typed on the keyboard, delivered as
//!   [`SimInput`] over an `mpsc` channel from the window.
//! * [`ScriptedHand`] — a timeline of finger states loaded from TOML.

use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};

use serde::Deserialize;
use tracing::{debug, warn};

use chakra_core::{classify, FingerStates, GestureLabel, Timestamp};

use crate::error::AppError;
use crate::frame::{blend, Frame};
use crate::overlay;

// ════════════════════════════════════════════════════════════════════════════
// Frames
// ════════════════════════════════════════════════════════════════════════════

pub trait FrameSource {
    /// Next frame, or `None` when capture has failed / ended.
    fn read(&mut self) -> Option<Frame>;
}

/// Stand-in camera producing a vignetted backdrop each tick.
pub struct SimCamera {
    backdrop:    Frame,
    frame_limit: Option<u64>,
    produced:    u64,
}

impl SimCamera {
    pub fn new(width: usize, height: usize) -> Self {
        SimCamera { backdrop: backdrop(width, height), frame_limit: None, produced: 0 }
    }

    /// Fail the read after `limit` frames (headless batch runs).
    pub fn with_frame_limit(mut self, limit: Option<u64>) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn produced(&self) -> u64 { self.produced }
}

impl FrameSource for SimCamera {
    fn read(&mut self) -> Option<Frame> {
        if self.frame_limit.is_some_and(|limit| self.produced >= limit) {
            return None;
        }
        self.produced += 1;
        Some(self.backdrop.clone())
    }
}

fn backdrop(width: usize, height: usize) -> Frame {
    const CENTER: u32 = 0xFF2A2A40;
    const EDGE:   u32 = 0xFF0C0C14;
    let mut f = Frame::new(width, height, EDGE);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let max_d = (cx * cx + cy * cy).sqrt().max(1.0);
    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let t = (dx * dx + dy * dy).sqrt() / max_d;
            f.set_pixel(x as isize, y as isize, blend(CENTER, EDGE, t));
        }
    }
    f
}

// ════════════════════════════════════════════════════════════════════════════
// Hand tracking
// ════════════════════════════════════════════════════════════════════════════

/// What the tracker saw in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Detection {
    /// `None` when no hand is in view.
    pub label:   Option<GestureLabel>,
    pub fingers: Option<FingerStates>,
}

impl Detection {
    pub fn from_fingers(fingers: Option<FingerStates>) -> Self {
        Detection { label: fingers.map(classify), fingers }
    }
}

pub trait HandTracker {
    /// Classify the hand in `frame`, annotating the frame with what was found.
    fn detect(&mut self, frame: &mut Frame, now: Timestamp) -> Detection;
}

// ── keyboard simulation ───────────────────────────────────────────────────

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Hand in view with these fingers extended.
    Fingers(FingerStates),
    /// Hand left the view.
    HandAway,
}

/// Tracker fed by [`SimInput`]s; keeps the last reported hand between
/// updates since the window only sends changes.
pub struct SimHandTracker {
    rx:      Receiver<SimInput>,
    current: Option<FingerStates>,
}

impl SimHandTracker {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandTracker { rx, current: None }
    }
}

impl HandTracker for SimHandTracker {
    fn detect(&mut self, frame: &mut Frame, _now: Timestamp) -> Detection {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Fingers(f)) => self.current = Some(f),
                Ok(SimInput::HandAway)   => self.current = None,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // window gone; keep the last pose until the loop notices
                    break;
                }
            }
        }
        let detection = Detection::from_fingers(self.current);
        overlay::draw_hand(frame, &detection);
        detection
    }
}

// ── scripted hand ─────────────────────────────────────────────────────────

/// One entry of a hand script: from `at` seconds (relative to the first
/// tick) the hand shows `fingers`, or is out of view if `fingers` is absent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub at:      f64,
    #[serde(default)]
    pub fingers: Option<[u8; 5]>,
}

/// ```toml
/// [[step]]
/// at = 0.0
/// fingers = [0, 0, 0, 0, 0]   # fist
///
/// [[step]]
/// at = 1.0                    # hand away
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HandScript {
    #[serde(rename = "step", default)]
    pub steps: Vec<ScriptStep>,
}

impl HandScript {
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let script: HandScript = toml::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), AppError> {
        if let Some(bad) = self.steps.iter().find(|s| !(s.at >= 0.0) || !s.at.is_finite()) {
            return Err(AppError::InvalidScript(format!("step time {} is not a non-negative number", bad.at)));
        }
        if self.steps.windows(2).any(|w| w[1].at < w[0].at) {
            return Err(AppError::InvalidScript("steps must be in ascending time order".into()));
        }
        Ok(())
    }

    /// The hand at `elapsed` seconds into the script.
    pub fn fingers_at(&self, elapsed: f64) -> Option<FingerStates> {
        self.steps
            .iter()
            .take_while(|s| s.at <= elapsed)
            .last()
            .and_then(|s| s.fingers)
            .map(FingerStates::from_bits)
    }

    /// Time of the last step; after it the hand no longer changes.
    pub fn end(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.at)
    }
}

pub struct ScriptedHand {
    script: HandScript,
    origin: Option<Timestamp>,
    ended:  bool,
}

impl ScriptedHand {
    pub fn new(script: HandScript) -> Self {
        if script.steps.is_empty() {
            warn!("hand script has no steps; no hand will be seen");
        }
        ScriptedHand { script, origin: None, ended: false }
    }
}

impl HandTracker for ScriptedHand {
    fn detect(&mut self, frame: &mut Frame, now: Timestamp) -> Detection {
        let origin = *self.origin.get_or_insert(now);
        let elapsed = now - origin;
        if !self.ended && elapsed > self.script.end() {
            self.ended = true;
            debug!(elapsed, "hand script finished");
        }
        let detection = Detection::from_fingers(self.script.fingers_at(elapsed));
        overlay::draw_hand(frame, &detection);
        detection
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
