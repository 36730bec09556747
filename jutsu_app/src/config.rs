//! Application configuration: the engine balance plus audio settings.
//!
//! ```toml
//! [engine]
//! hold_threshold = 0.5
//!
//! [engine.pool]
//! capacity = 100
//!
//! [audio]
//! enabled = true
//! program = 80      # GM Lead Square
//! ```

use std::path::Path;

use chakra_core::{ConfigError, EngineConfig};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled:  bool,
    /// General MIDI program (0–127) used for every cue.
    pub program:  u8,
    pub channel:  u8,
    pub velocity: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig { enabled: true, program: 80, channel: 0, velocity: 110 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub audio:  AudioConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut cfg: AppConfig = toml::from_str(text)?;
        cfg.engine.validate()?;
        cfg.audio.program  = cfg.audio.program.min(127);
        cfg.audio.channel  = cfg.audio.channel.min(15);
        cfg.audio.velocity = cfg.audio.velocity.min(127);
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_optional() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn nested_engine_section() {
        let cfg = AppConfig::from_toml_str(
            "[engine]\nhold_threshold = 1.0\n[engine.pool]\nregen_rate = 2\n[audio]\nenabled = false\nchannel = 40",
        )
        .unwrap();
        assert_eq!(cfg.engine.hold_threshold, 1.0);
        assert_eq!(cfg.engine.pool.regen_rate, 2.0);
        assert!(!cfg.audio.enabled);
        assert_eq!(cfg.audio.channel, 15);
    }

    #[test]
    fn engine_validation_applies() {
        assert!(AppConfig::from_toml_str("[engine.pool]\ncapacity = -3").is_err());
    }
}
