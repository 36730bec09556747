//! Engine tuning loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) gives the stock
//! balance.  Tables keyed by gesture use display names (`"Open Palm"`); a
//! `costs` or `cooldowns` table in the file replaces the stock table rather
//! than merging with it, so leaving a gesture out of `costs` disables it.
//!
//! ```toml
//! hold_threshold  = 0.5
//! effect_duration = 1.5
//!
//! [pool]
//! capacity   = 100
//! regen_rate = 0.5
//!
//! [pool.costs]
//! "Fist" = 30
//! "Point" = 15
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gesture::Gesture;

// ════════════════════════════════════════════════════════════════════════════
// PoolConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub capacity:          f64,
    /// Chakra restored per tick.
    pub regen_rate:        f64,
    /// Cooldown for gestures with a cost but no entry in `cooldowns`.
    pub fallback_cooldown: f64,
    pub costs:             BTreeMap<String, f64>,
    pub cooldowns:         BTreeMap<String, f64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let table = |f: fn(Gesture) -> f64| -> BTreeMap<String, f64> {
            Gesture::ALL.iter().map(|&g| (g.name().to_string(), f(g))).collect()
        };
        PoolConfig {
            capacity:          100.0,
            regen_rate:        0.5,
            fallback_cooldown: 2.0,
            costs:             table(default_cost),
            cooldowns:         table(default_cooldown),
        }
    }
}

fn default_cost(g: Gesture) -> f64 {
    match g {
        Gesture::Fist         => 30.0,
        Gesture::OpenPalm     => 25.0,
        Gesture::PeaceSign    => 40.0,
        Gesture::ThumbsUp     => 20.0,
        Gesture::RockSign     => 35.0,
        Gesture::GunSign      => 30.0,
        Gesture::ThreeFingers => 25.0,
        Gesture::Point        => 15.0,
    }
}

fn default_cooldown(g: Gesture) -> f64 {
    match g {
        Gesture::Fist         => 2.0,
        Gesture::OpenPalm     => 3.0,
        Gesture::PeaceSign    => 4.0,
        Gesture::ThumbsUp     => 2.0,
        Gesture::RockSign     => 3.5,
        Gesture::GunSign      => 2.5,
        Gesture::ThreeFingers => 2.0,
        Gesture::Point        => 1.5,
    }
}

impl PoolConfig {
    /// Resolve the name-keyed cost table, rejecting unknown names and
    /// negative values.
    pub fn resolved_costs(&self) -> Result<Vec<(Gesture, f64)>, ConfigError> {
        resolve_table("cost", &self.costs)
    }

    pub fn resolved_cooldowns(&self) -> Result<Vec<(Gesture, f64)>, ConfigError> {
        resolve_table("cooldown", &self.cooldowns)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.capacity > 0.0) || !self.capacity.is_finite() {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        non_negative("regen_rate", self.regen_rate)?;
        non_negative("fallback_cooldown", self.fallback_cooldown)?;
        self.resolved_costs()?;
        self.resolved_cooldowns()?;
        Ok(())
    }
}

fn resolve_table(
    what:  &str,
    table: &BTreeMap<String, f64>,
) -> Result<Vec<(Gesture, f64)>, ConfigError> {
    table
        .iter()
        .map(|(name, &value)| {
            let g = Gesture::from_name(name)
                .ok_or_else(|| ConfigError::UnknownGesture(name.clone()))?;
            non_negative(&format!("{} of {}", what, g), value)?;
            Ok((g, value))
        })
        .collect()
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field: field.to_string(), value })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EngineConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pool:            PoolConfig,
    /// Seconds a pose must be held before it counts.
    pub hold_threshold:  f64,
    /// Seconds an activation overlay stays on screen.
    pub effect_duration: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            pool:            PoolConfig::default(),
            hold_threshold:  0.5,
            effect_duration: 1.5,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;
        non_negative("hold_threshold", self.hold_threshold)?;
        non_negative("effect_duration", self.effect_duration)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
