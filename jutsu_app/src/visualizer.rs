//! Presenting frames and reading keys.
//!
//! [`Visualizer`] is the `minifb` window; [`HeadlessScreen`] stands in for it
//! in batch runs and tests.  Both implement [`Screen`].

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::debug;

use chakra_core::FingerStates;

use crate::error::AppError;
use crate::frame::Frame;
use crate::tracking::SimInput;

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;

/// Commands read from the keyboard, at most one per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    ResetChakra,
    TogglePause,
}

pub trait Screen {
    fn is_open(&self) -> bool;
    fn present(&mut self, frame: &Frame) -> Result<(), AppError>;
    /// Non-blocking; `None` when no command key was pressed.
    fn poll_command(&mut self) -> Option<KeyCommand>;
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer — minifb window
// ════════════════════════════════════════════════════════════════════════════

/// The window.  Besides commands, it turns the finger keys into
/// [`SimInput`]s for the keyboard hand tracker:
///
/// | Key | Meaning |
/// |---|---|
/// | `1`–`5` held | thumb … pinky extended |
/// | `Tab` held | hand in view (needed for a fist) |
/// | `Q` / `Esc` | quit |
/// | `R` | reset chakra |
/// | `P` | pause / resume |
pub struct Visualizer {
    window:    Window,
    sim_tx:    Sender<SimInput>,
    last_sent: Option<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, fps: u32) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Jutsu Recognition System",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        let frame_ms = 1000 / fps.clamp(1, 240) as u64;
        window.limit_update_rate(Some(Duration::from_millis(frame_ms)));

        Ok(Visualizer { window, sim_tx, last_sent: None })
    }

    fn current_hand(&self) -> SimInput {
        const FINGER_KEYS: [Key; 5] = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];
        let fingers = FingerStates(FINGER_KEYS.map(|k| self.window.is_key_down(k)));
        if self.window.is_key_down(Key::Tab) || fingers.extended_count() > 0 {
            SimInput::Fingers(fingers)
        } else {
            SimInput::HandAway
        }
    }
}

impl Screen for Visualizer {
    fn is_open(&self) -> bool { self.window.is_open() }

    fn present(&mut self, frame: &Frame) -> Result<(), AppError> {
        self.window
            .update_with_buffer(frame.pixels(), frame.width(), frame.height())
            .map_err(|e| AppError::Window(e.to_string()))
    }

    fn poll_command(&mut self) -> Option<KeyCommand> {
        let hand = self.current_hand();
        if self.last_sent != Some(hand) {
            debug!(?hand, "simulated hand changed");
            let _ = self.sim_tx.send(hand);
            self.last_sent = Some(hand);
        }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::Q) || pressed(Key::Escape) {
            Some(KeyCommand::Quit)
        } else if pressed(Key::R) {
            Some(KeyCommand::ResetChakra)
        } else if pressed(Key::P) {
            Some(KeyCommand::TogglePause)
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HeadlessScreen
// ════════════════════════════════════════════════════════════════════════════

/// Discards frames and replays a queue of commands, one per tick.
#[derive(Debug, Default)]
pub struct HeadlessScreen {
    presented: u64,
    commands:  Vec<(u64, KeyCommand)>,
}

impl HeadlessScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `cmd` on the poll that follows presenting frame `frame_no`
    /// (1-based).
    pub fn with_command(mut self, frame_no: u64, cmd: KeyCommand) -> Self {
        self.commands.push((frame_no, cmd));
        self
    }

    pub fn presented(&self) -> u64 { self.presented }
}

impl Screen for HeadlessScreen {
    fn is_open(&self) -> bool { true }

    fn present(&mut self, _frame: &Frame) -> Result<(), AppError> {
        self.presented += 1;
        Ok(())
    }

    fn poll_command(&mut self) -> Option<KeyCommand> {
        let idx = self.commands.iter().position(|&(n, _)| n == self.presented)?;
        Some(self.commands.remove(idx).1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_replays_commands_in_order() {
        let mut s = HeadlessScreen::new()
            .with_command(2, KeyCommand::TogglePause)
            .with_command(3, KeyCommand::Quit);
        let f = Frame::new(1, 1, 0);
        s.present(&f).unwrap();
        assert_eq!(s.poll_command(), None);
        s.present(&f).unwrap();
        assert_eq!(s.poll_command(), Some(KeyCommand::TogglePause));
        assert_eq!(s.poll_command(), None);
        s.present(&f).unwrap();
        assert_eq!(s.poll_command(), Some(KeyCommand::Quit));
        assert_eq!(s.presented(), 3);
    }
}
