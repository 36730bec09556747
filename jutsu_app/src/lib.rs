//! # jutsu_app
//!
//! Real-time hand-sign demo on top of [`chakra_core`]: a hand tracker
//! classifies each frame, the engine confirms held signs and spends chakra,
//! and the window draws the jutsu effect and a HUD.
//!
//! ## Hand tracking
//!
//! * (default) — **Keyboard simulation**: hold finger keys in the window.
//! * `--script hand.toml` — **Scripted hand**: replay a timeline of poses.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`5` held | Thumb, index, middle, ring, pinky extended |
//! | `Tab` held | Hand in view (show a fist) |
//! | `R` | Reset chakra and cooldowns |
//! | `P` | Pause / resume |
//! | `Q` / `Escape` | Quit |
//!
//! ## Sound
//!
//! Fireball, Chidori and Shadow Clone play a short MIDI phrase on the first
//! available output port.  Without a port the run is silent.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod tracking;
pub mod visualizer;
