//! Time as seen by the engine.
//!
//! All engine operations take an explicit [`Timestamp`] (seconds on a
//! monotonic clock).  The driver samples a [`Clock`] once near the top of each
//! tick and reuses that value for every decision in the tick.

use std::time::Instant;

/// Seconds since an arbitrary, fixed origin.
pub type Timestamp = f64;

/// Slack applied to threshold comparisons so that decimal timestamps such as
/// `0.6 - 0.1` still count as a full `0.5`.
pub const TIME_EPSILON: f64 = 1e-9;

/// True once `now` is at least `span` seconds past `start`.
pub fn elapsed_at_least(start: Timestamp, now: Timestamp, span: f64) -> bool {
    now - start + TIME_EPSILON >= span
}

/// True while `deadline` is still ahead of `now`.
pub fn before_deadline(now: Timestamp, deadline: Timestamp) -> bool {
    deadline - now > TIME_EPSILON
}

pub trait Clock {
    fn now(&mut self) -> Timestamp;
}

/// Wall-independent clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Timestamp {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock for headless runs and tests: the first reading is
/// `start`, each later reading is one `step` further on.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    next: Timestamp,
    step: f64,
}

impl FixedStepClock {
    pub fn new(start: Timestamp, step: f64) -> Self {
        FixedStepClock { next: start, step }
    }

    /// A clock ticking at `fps` frames per second from zero.
    pub fn at_fps(fps: u32) -> Self {
        FixedStepClock::new(0.0, 1.0 / fps.max(1) as f64)
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> Timestamp {
        let t = self.next;
        self.next += self.step;
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_differences_meet_threshold() {
        assert!(elapsed_at_least(0.1, 0.6, 0.5));
        assert!(!elapsed_at_least(0.1, 0.4, 0.5));
    }

    #[test]
    fn deadline_reached_exactly_is_not_before() {
        assert!(before_deadline(1.0, 2.0));
        assert!(!before_deadline(2.0, 2.0));
        assert!(!before_deadline(2.1, 2.0));
    }

    #[test]
    fn fixed_step_clock_advances_per_reading() {
        let mut c = FixedStepClock::new(1.0, 0.25);
        assert_eq!(c.now(), 1.0);
        assert_eq!(c.now(), 1.25);
        assert_eq!(c.now(), 1.5);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let mut c = MonotonicClock::new();
        let a = c.now();
        let b = c.now();
        assert!(b >= a);
    }
}
