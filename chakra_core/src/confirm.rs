//! Hold-to-confirm debounce for per-frame gesture labels.
//!
//! ```text
//!            new label                 same label, held ≥ threshold
//!   Idle ───────────────► Holding ───────────────────────────────► Spent
//!    ▲                     │  ▲                                      │
//!    │ no hand / unknown   │  └──────────── different label ─────────┘
//!    └─────────────────────┴──────────────── (from any state) ───────┘
//! ```
//!
//! **ReadyToConfirm** is not stored: it is the threshold check made while
//! Holding.  Confirming moves to **Spent**, which carries no timer, so a pose
//! kept perfectly still fires once; the hand must drop or change pose before
//! the same gesture can start a new hold.

use tracing::trace;

use crate::clock::{elapsed_at_least, Timestamp};
use crate::gesture::{Gesture, GestureLabel};

/// The gesture currently being held and when the hold began.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hold {
    pub gesture:    Gesture,
    pub started_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum HoldState {
    Idle,
    Holding(Hold),
    /// Confirmed and still shown; waits for release or a different pose.
    Spent(Gesture),
}

#[derive(Clone, Debug)]
pub struct GestureConfirmer {
    state:     HoldState,
    threshold: f64,
}

impl GestureConfirmer {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    pub fn new(threshold: f64) -> Self {
        GestureConfirmer { state: HoldState::Idle, threshold: threshold.max(0.0) }
    }

    /// Feed one tick's observation; returns the gesture on the tick its hold
    /// is confirmed.
    ///
    /// `observed` is `None` when no hand is in view.
    pub fn update(&mut self, observed: Option<GestureLabel>, now: Timestamp) -> Option<Gesture> {
        let Some(gesture) = observed.and_then(GestureLabel::gesture) else {
            self.state = HoldState::Idle;
            return None;
        };

        match self.state {
            HoldState::Holding(hold) if hold.gesture == gesture => {
                if elapsed_at_least(hold.started_at, now, self.threshold) {
                    trace!(%gesture, held = now - hold.started_at, "hold confirmed");
                    self.state = HoldState::Spent(gesture);
                    Some(gesture)
                } else {
                    None
                }
            }
            HoldState::Spent(spent) if spent == gesture => None,
            _ => {
                self.state = HoldState::Holding(Hold { gesture, started_at: now });
                None
            }
        }
    }

    /// The hold in progress, if any.  `None` while Idle or Spent.
    pub fn hold(&self) -> Option<Hold> {
        match self.state {
            HoldState::Holding(h) => Some(h),
            _ => None,
        }
    }

    /// The gesture last seen, whether still timing or already confirmed.
    pub fn current(&self) -> Option<Gesture> {
        match self.state {
            HoldState::Idle       => None,
            HoldState::Holding(h) => Some(h.gesture),
            HoldState::Spent(g)   => Some(g),
        }
    }

    pub fn threshold(&self) -> f64 { self.threshold }

    /// Fraction of the threshold the current hold has covered, 0.0–1.0.
    pub fn hold_progress(&self, now: Timestamp) -> f64 {
        match self.state {
            HoldState::Holding(h) if self.threshold > 0.0 => {
                ((now - h.started_at) / self.threshold).clamp(0.0, 1.0)
            }
            HoldState::Holding(_) | HoldState::Spent(_) => 1.0,
            HoldState::Idle => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
    }
}

impl Default for GestureConfirmer {
    fn default() -> Self {
        GestureConfirmer::new(Self::DEFAULT_THRESHOLD)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const FIST: Option<GestureLabel> = Some(GestureLabel::Recognized(Gesture::Fist));
    const PALM: Option<GestureLabel> = Some(GestureLabel::Recognized(Gesture::OpenPalm));

    #[test]
    fn confirms_once_threshold_reached() {
        let mut c = GestureConfirmer::new(0.5);
        assert_eq!(c.update(FIST, 0.0), None);
        assert_eq!(c.update(FIST, 0.3), None);
        assert_eq!(c.update(FIST, 0.5), Some(Gesture::Fist));
        // the hold was cleared by the confirmation
        assert_eq!(c.update(FIST, 0.5), None);
        assert_eq!(c.hold(), None);
    }

    #[test]
    fn does_not_confirm_before_threshold() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        assert_eq!(c.update(FIST, 0.49), None);
        assert_eq!(c.update(FIST, 0.5), Some(Gesture::Fist));
    }

    #[test]
    fn switching_label_restarts_timer() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        assert_eq!(c.update(PALM, 0.1), None);
        assert_eq!(c.update(PALM, 0.4), None);
        assert_eq!(c.update(PALM, 0.59), None);
        assert_eq!(c.update(PALM, 0.6), Some(Gesture::OpenPalm));
    }

    #[test]
    fn returning_to_earlier_label_still_waits() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        c.update(PALM, 0.4);
        assert_eq!(c.update(FIST, 0.6), None);
        assert_eq!(c.hold().map(|h| h.started_at), Some(0.6));
    }

    #[test]
    fn static_hold_confirms_exactly_once() {
        let mut c = GestureConfirmer::new(0.5);
        let mut confirmations = 0;
        let mut t = 0.0;
        while t <= 5.0 {
            if c.update(FIST, t).is_some() {
                confirmations += 1;
            }
            t += 1.0 / 30.0;
        }
        assert_eq!(confirmations, 1);
        assert_eq!(c.current(), Some(Gesture::Fist));
    }

    #[test]
    fn release_and_reapply_confirms_again() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        assert_eq!(c.update(FIST, 0.5), Some(Gesture::Fist));
        assert_eq!(c.update(None, 0.6), None);
        assert_eq!(c.update(FIST, 0.7), None);
        assert_eq!(c.update(FIST, 1.2), Some(Gesture::Fist));
    }

    #[test]
    fn changing_pose_after_confirmation_starts_new_hold() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        c.update(FIST, 0.5);
        assert_eq!(c.update(PALM, 0.6), None);
        assert_eq!(c.update(FIST, 0.7), None);
        assert_eq!(c.update(FIST, 1.2), Some(Gesture::Fist));
    }

    #[test]
    fn no_hand_or_unrecognized_resets() {
        let mut c = GestureConfirmer::new(0.5);
        c.update(FIST, 0.0);
        assert_eq!(c.update(Some(GestureLabel::Unrecognized), 0.2), None);
        assert_eq!(c.current(), None);
        c.update(FIST, 0.3);
        c.update(None, 0.4);
        assert_eq!(c.current(), None);
        assert_eq!(c.update(FIST, 0.8), None);
    }

    #[test]
    fn hold_progress_tracks_fraction() {
        let mut c = GestureConfirmer::new(0.5);
        assert_eq!(c.hold_progress(0.0), 0.0);
        c.update(FIST, 1.0);
        assert!((c.hold_progress(1.25) - 0.5).abs() < 1e-9);
        assert_eq!(c.hold_progress(9.0), 1.0);
    }
}
