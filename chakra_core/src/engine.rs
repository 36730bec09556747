//! `JutsuEngine` ties the confirmer, the pool and the effect list together
//! and runs the gating half of one tick.

use tracing::info;

use crate::clock::Timestamp;
use crate::config::EngineConfig;
use crate::confirm::GestureConfirmer;
use crate::effects::EffectTracker;
use crate::error::ConfigError;
use crate::gesture::GestureLabel;
use crate::jutsu::ActivationEvent;
use crate::pool::ResourcePool;

#[derive(Debug, Clone)]
pub struct JutsuEngine {
    confirmer:       GestureConfirmer,
    pool:            ResourcePool,
    effects:         EffectTracker,
    last_activation: Option<ActivationEvent>,
}

impl JutsuEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(JutsuEngine {
            confirmer:       GestureConfirmer::new(config.hold_threshold),
            pool:            ResourcePool::new(&config.pool)?,
            effects:         EffectTracker::new(config.effect_duration),
            last_activation: None,
        })
    }

    /// One tick: confirm, maybe activate, regenerate, advance effects.
    ///
    /// `observed` is the frame's classification, `None` with no hand in view.
    /// A confirmed gesture the pool refuses is dropped silently; the hold is
    /// still consumed.
    pub fn tick(&mut self, observed: Option<GestureLabel>, now: Timestamp) -> Option<ActivationEvent> {
        let activation = self
            .confirmer
            .update(observed, now)
            .filter(|&g| self.pool.try_activate(g, now))
            .map(|action| ActivationEvent { action, activated_at: now });

        if let Some(event) = activation {
            info!(
                gesture = %event.action,
                jutsu = event.jutsu().name,
                chakra = self.pool.level(),
                "jutsu activated"
            );
            self.effects.spawn(event);
            self.last_activation = Some(event);
        }

        self.pool.regenerate();
        self.effects.advance(now);
        activation
    }

    /// Refill the pool and clear cooldowns.  Holds and effects are kept.
    pub fn reset_chakra(&mut self) {
        self.pool.reset();
        info!("chakra reset to maximum");
    }

    pub fn pool(&self)      -> &ResourcePool     { &self.pool }
    pub fn confirmer(&self) -> &GestureConfirmer { &self.confirmer }
    pub fn effects(&self)   -> &EffectTracker    { &self.effects }
    pub fn last_activation(&self) -> Option<ActivationEvent> { self.last_activation }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;

    const FIST: Option<GestureLabel> = Some(GestureLabel::Recognized(Gesture::Fist));
    const PEACE: Option<GestureLabel> = Some(GestureLabel::Recognized(Gesture::PeaceSign));

    fn engine() -> JutsuEngine {
        JutsuEngine::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn held_gesture_activates_and_spawns_effect() {
        let mut e = engine();
        assert!(e.tick(FIST, 0.0).is_none());
        let ev = e.tick(FIST, 0.5).unwrap();
        assert_eq!(ev.action, Gesture::Fist);
        assert_eq!(ev.activated_at, 0.5);
        assert_eq!(e.effects().effects().len(), 1);
        // 100 - 30 + 0.5 regen on the same tick
        assert_eq!(e.pool().level(), 70.5);
        assert_eq!(e.last_activation(), Some(ev));
    }

    #[test]
    fn refused_activation_still_consumes_hold() {
        let mut e = engine();
        e.tick(FIST, 0.0);
        e.tick(FIST, 0.5);
        // release, re-form while on cooldown
        e.tick(None, 0.6);
        e.tick(FIST, 0.7);
        assert!(e.tick(FIST, 1.2).is_none());
        assert_eq!(e.confirmer().hold(), None);
        // still held: nothing more until released, even after cooldown
        assert!(e.tick(FIST, 3.0).is_none());
    }

    #[test]
    fn regenerates_without_gesture() {
        let mut e = engine();
        e.tick(PEACE, 0.0);
        e.tick(PEACE, 0.5);
        let after = e.pool().level();
        e.tick(None, 0.6);
        assert_eq!(e.pool().level(), after + 0.5);
    }

    #[test]
    fn effects_expire_after_duration() {
        let mut e = engine();
        e.tick(FIST, 0.0);
        e.tick(FIST, 0.5);
        e.tick(None, 1.9);
        assert_eq!(e.effects().effects().len(), 1);
        e.tick(None, 2.1);
        assert!(e.effects().is_empty());
    }

    #[test]
    fn reset_chakra_clears_cooldowns() {
        let mut e = engine();
        e.tick(FIST, 0.0);
        e.tick(FIST, 0.5);
        e.reset_chakra();
        assert_eq!(e.pool().percentage(), 100.0);
        assert_eq!(e.pool().cooldown_remaining(Gesture::Fist, 0.6), 0.0);
    }
}
