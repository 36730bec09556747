//! # chakra_core
//!
//! The decision logic behind the jutsu demo: a hand pose is held long enough
//! to count as a deliberate gesture, the gesture names a jutsu, and the jutsu
//! is only released if the chakra pool can pay for it and its cooldown has run
//! out.
//!
//! ## Per-tick flow
//!
//! ```text
//! label ─► GestureConfirmer::update ─► ResourcePool::try_activate ─► ActivationEvent
//!                                      ResourcePool::regenerate   (every tick)
//!                                      EffectTracker::advance     (every tick)
//! ```
//!
//! Everything here is single-threaded and clock-agnostic: callers sample a
//! [`Clock`] once per tick and pass the same [`Timestamp`] to every call.
//!
//! ## Quick start
//!
//! ```rust
//! use chakra_core::{EngineConfig, JutsuEngine, Gesture, GestureLabel};
//!
//! let mut engine = JutsuEngine::new(&EngineConfig::default()).unwrap();
//! let fist = Some(GestureLabel::Recognized(Gesture::Fist));
//!
//! assert!(engine.tick(fist, 0.0).is_none());          // hold starts
//! let event = engine.tick(fist, 0.5).unwrap();        // held 0.5 s
//! assert_eq!(event.jutsu().name, "Fire Style: Fireball Jutsu");
//! assert!(engine.pool().cooldown_remaining(Gesture::Fist, 0.5) > 0.0);
//! ```

pub mod clock;
pub mod config;
pub mod confirm;
pub mod effects;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod jutsu;
pub mod pool;

pub use clock::{Clock, FixedStepClock, MonotonicClock, Timestamp};
pub use config::{EngineConfig, PoolConfig};
pub use confirm::{GestureConfirmer, Hold};
pub use effects::{ActiveEffect, EffectTracker};
pub use engine::JutsuEngine;
pub use error::ConfigError;
pub use gesture::{classify, FingerStates, Gesture, GestureLabel};
pub use jutsu::{ActivationEvent, EffectShape, Jutsu};
pub use pool::{LevelBand, ResourcePool};
