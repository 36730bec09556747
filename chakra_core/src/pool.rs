//! The chakra pool: a bounded, regenerating budget that gates jutsu.
//!
//! Costs and cooldown durations are fixed when the pool is built.  The only
//! state that changes afterwards is the current level and the table of
//! cooldown end-times.

use std::collections::HashMap;

use tracing::debug;

use crate::clock::{before_deadline, Timestamp};
use crate::config::PoolConfig;
use crate::error::ConfigError;
use crate::gesture::Gesture;

/// Coarse chakra level for HUD colouring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelBand {
    /// Above 60 %.
    High,
    /// Above 30 %.
    Medium,
    Low,
}

#[derive(Debug, Clone)]
pub struct ResourcePool {
    capacity:           f64,
    level:              f64,
    regen_rate:         f64,
    costs:              HashMap<Gesture, f64>,
    cooldown_durations: HashMap<Gesture, f64>,
    fallback_cooldown:  f64,
    /// Absent = never used or cleared.  Stale entries stay until `reset`.
    cooldown_ends:      HashMap<Gesture, Timestamp>,
}

impl ResourcePool {
    /// Build a full pool from validated configuration.
    pub fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ResourcePool {
            capacity:           config.capacity,
            level:              config.capacity,
            regen_rate:         config.regen_rate,
            costs:              config.resolved_costs()?.into_iter().collect(),
            cooldown_durations: config.resolved_cooldowns()?.into_iter().collect(),
            fallback_cooldown:  config.fallback_cooldown,
            cooldown_ends:      HashMap::new(),
        })
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// True if `gesture` has a cost, the pool can pay it, and its cooldown
    /// has ended by `now`.
    pub fn can_activate(&self, gesture: Gesture, now: Timestamp) -> bool {
        let Some(&cost) = self.costs.get(&gesture) else { return false };
        if self.level < cost {
            return false;
        }
        !self.on_cooldown(gesture, now)
    }

    pub fn on_cooldown(&self, gesture: Gesture, now: Timestamp) -> bool {
        self.cooldown_ends
            .get(&gesture)
            .is_some_and(|&end| before_deadline(now, end))
    }

    /// Seconds until `gesture` is off cooldown; 0 if ready or never used.
    pub fn cooldown_remaining(&self, gesture: Gesture, now: Timestamp) -> f64 {
        self.cooldown_ends
            .get(&gesture)
            .map_or(0.0, |&end| (end - now).max(0.0))
    }

    /// Current level as a percentage of capacity, 0.0–100.0.
    pub fn percentage(&self) -> f64 {
        100.0 * self.level / self.capacity
    }

    pub fn level_band(&self) -> LevelBand {
        let pct = self.percentage();
        if pct > 60.0 {
            LevelBand::High
        } else if pct > 30.0 {
            LevelBand::Medium
        } else {
            LevelBand::Low
        }
    }

    pub fn level(&self)    -> f64 { self.level }
    pub fn capacity(&self) -> f64 { self.capacity }
    pub fn regen_rate(&self) -> f64 { self.regen_rate }
    pub fn cost(&self, gesture: Gesture) -> Option<f64> { self.costs.get(&gesture).copied() }

    pub fn cooldown_duration(&self, gesture: Gesture) -> f64 {
        self.cooldown_durations
            .get(&gesture)
            .copied()
            .unwrap_or(self.fallback_cooldown)
    }

    /// When `gesture` comes off cooldown, if it has been used since the last
    /// reset.
    pub fn cooldown_end(&self, gesture: Gesture) -> Option<Timestamp> {
        self.cooldown_ends.get(&gesture).copied()
    }

    // ── mutation ──────────────────────────────────────────────────────────

    /// Spend the cost of `gesture` and start its cooldown, if allowed.
    /// Returns false and leaves the pool untouched otherwise.
    pub fn try_activate(&mut self, gesture: Gesture, now: Timestamp) -> bool {
        if !self.can_activate(gesture, now) {
            debug!(
                %gesture,
                level = self.level,
                cooldown = self.cooldown_remaining(gesture, now),
                "activation refused"
            );
            return false;
        }
        let cost = self.costs.get(&gesture).copied().unwrap_or_default();
        self.level = (self.level - cost).max(0.0);
        let end = now + self.cooldown_duration(gesture);
        self.cooldown_ends.insert(gesture, end);
        true
    }

    /// Add one tick of regeneration, capped at capacity.
    pub fn regenerate(&mut self) {
        if self.level < self.capacity {
            self.level = (self.level + self.regen_rate).min(self.capacity);
        }
    }

    /// Refill to capacity and clear every cooldown.
    pub fn reset(&mut self) {
        self.level = self.capacity;
        self.cooldown_ends.clear();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn fist_only(capacity: f64, regen_rate: f64) -> ResourcePool {
        let cfg = PoolConfig {
            capacity,
            regen_rate,
            fallback_cooldown: 2.0,
            costs:     BTreeMap::from([("Fist".to_string(), 30.0)]),
            cooldowns: BTreeMap::from([("Fist".to_string(), 2.0)]),
        };
        ResourcePool::new(&cfg).unwrap()
    }

    #[test]
    fn fist_scenario() {
        let mut pool = fist_only(100.0, 0.0);
        assert!(pool.try_activate(Gesture::Fist, 0.0));
        assert_eq!(pool.level(), 70.0);
        assert_eq!(pool.cooldown_end(Gesture::Fist), Some(2.0));

        assert!(!pool.try_activate(Gesture::Fist, 1.0));
        assert_eq!(pool.level(), 70.0);

        assert!(pool.try_activate(Gesture::Fist, 2.1));
        assert_eq!(pool.level(), 40.0);
    }

    #[test]
    fn cooldown_ends_exactly_at_deadline() {
        let mut pool = fist_only(100.0, 0.0);
        pool.try_activate(Gesture::Fist, 0.0);
        assert!(!pool.can_activate(Gesture::Fist, 1.999));
        assert!(pool.can_activate(Gesture::Fist, 2.0));
    }

    #[test]
    fn unknown_action_is_refused_without_change() {
        let mut pool = fist_only(100.0, 0.0);
        assert!(!pool.can_activate(Gesture::Point, 0.0));
        assert!(!pool.try_activate(Gesture::Point, 0.0));
        assert_eq!(pool.level(), 100.0);
        assert_eq!(pool.cooldown_remaining(Gesture::Point, 0.0), 0.0);
    }

    #[test]
    fn insufficient_level_is_refused() {
        let mut pool = fist_only(100.0, 0.0);
        pool.try_activate(Gesture::Fist, 0.0);
        pool.try_activate(Gesture::Fist, 3.0);
        pool.try_activate(Gesture::Fist, 6.0);
        assert_eq!(pool.level(), 10.0);
        assert!(!pool.try_activate(Gesture::Fist, 9.0));
        assert_eq!(pool.level(), 10.0);
        assert_eq!(pool.cooldown_end(Gesture::Fist), Some(8.0));
    }

    #[test]
    fn cost_above_capacity_is_never_affordable() {
        let cfg = PoolConfig {
            capacity: 50.0,
            costs: BTreeMap::from([("Peace Sign".to_string(), 80.0)]),
            ..PoolConfig::default()
        };
        let mut pool = ResourcePool::new(&cfg).unwrap();
        assert!(!pool.try_activate(Gesture::PeaceSign, 0.0));
        assert_eq!(pool.percentage(), 100.0);
    }

    #[test]
    fn fallback_cooldown_for_unlisted_duration() {
        let cfg = PoolConfig {
            fallback_cooldown: 7.0,
            cooldowns: BTreeMap::new(),
            ..PoolConfig::default()
        };
        let mut pool = ResourcePool::new(&cfg).unwrap();
        assert!(pool.try_activate(Gesture::Point, 1.0));
        assert_eq!(pool.cooldown_end(Gesture::Point), Some(8.0));
    }

    #[test]
    fn regenerate_caps_at_capacity() {
        let mut pool = fist_only(100.0, 0.5);
        pool.regenerate();
        assert_eq!(pool.level(), 100.0);

        pool.try_activate(Gesture::Fist, 0.0);
        pool.regenerate();
        assert_eq!(pool.level(), 70.5);
        for _ in 0..1000 { pool.regenerate(); }
        assert_eq!(pool.level(), 100.0);
    }

    #[test]
    fn cooldown_remaining_counts_down() {
        let mut pool = fist_only(100.0, 0.0);
        assert_eq!(pool.cooldown_remaining(Gesture::Fist, 0.0), 0.0);
        pool.try_activate(Gesture::Fist, 1.0);
        assert!((pool.cooldown_remaining(Gesture::Fist, 2.5) - 0.5).abs() < 1e-9);
        assert_eq!(pool.cooldown_remaining(Gesture::Fist, 10.0), 0.0);
    }

    #[test]
    fn reset_refills_and_clears() {
        let mut pool = ResourcePool::new(&PoolConfig::default()).unwrap();
        for g in Gesture::ALL {
            pool.try_activate(g, 0.0);
        }
        assert!(pool.percentage() < 100.0);
        pool.reset();
        assert_eq!(pool.percentage(), 100.0);
        for g in Gesture::ALL {
            assert_eq!(pool.cooldown_remaining(g, 0.0), 0.0);
        }
    }

    #[test]
    fn level_bands() {
        let mut pool = ResourcePool::new(&PoolConfig::default()).unwrap();
        assert_eq!(pool.level_band(), LevelBand::High);
        pool.try_activate(Gesture::PeaceSign, 0.0); // 60
        assert_eq!(pool.level_band(), LevelBand::Medium);
        pool.try_activate(Gesture::RockSign, 0.0); // 25
        assert_eq!(pool.level_band(), LevelBand::Low);
    }
}
