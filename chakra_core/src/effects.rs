//! Timed overlay effects.
//!
//! Each activation spawns an [`ActiveEffect`] whose `elapsed` only grows.
//! Finished effects are dropped with `retain`, never removed mid-iteration.

use crate::clock::Timestamp;
use crate::gesture::Gesture;
use crate::jutsu::{ActivationEvent, Jutsu};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveEffect {
    pub action:     Gesture,
    pub started_at: Timestamp,
    pub elapsed:    f64,
}

impl ActiveEffect {
    /// Animation progress 0.0–1.0 for an effect lasting `duration` seconds.
    pub fn progress(&self, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / duration).clamp(0.0, 1.0)
    }

    pub fn jutsu(&self) -> Jutsu {
        self.action.jutsu()
    }
}

#[derive(Debug, Clone)]
pub struct EffectTracker {
    effects:  Vec<ActiveEffect>,
    duration: f64,
}

impl EffectTracker {
    pub const DEFAULT_DURATION: f64 = 1.5;

    pub fn new(duration: f64) -> Self {
        EffectTracker { effects: Vec::new(), duration: duration.max(0.0) }
    }

    pub fn spawn(&mut self, event: ActivationEvent) {
        self.effects.push(ActiveEffect {
            action:     event.action,
            started_at: event.activated_at,
            elapsed:    0.0,
        });
    }

    /// Bring every effect up to `now` and drop the ones past `duration`.
    pub fn advance(&mut self, now: Timestamp) {
        for e in &mut self.effects {
            e.elapsed = e.elapsed.max(now - e.started_at);
        }
        let duration = self.duration;
        self.effects.retain(|e| e.elapsed <= duration);
    }

    pub fn effects(&self) -> &[ActiveEffect] { &self.effects }
    pub fn duration(&self) -> f64 { self.duration }
    pub fn is_empty(&self) -> bool { self.effects.is_empty() }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl Default for EffectTracker {
    fn default() -> Self {
        EffectTracker::new(Self::DEFAULT_DURATION)
    }
}
