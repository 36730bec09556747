use thiserror::Error;

/// Rejected engine configuration.
///
/// Gating outcomes (too little chakra, cooldown active, unknown action) are
/// not errors; they are `false` results from the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chakra capacity must be positive, got {0}")]
    InvalidCapacity(f64),

    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: String, value: f64 },

    #[error("unknown gesture name: {0:?}")]
    UnknownGesture(String),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
