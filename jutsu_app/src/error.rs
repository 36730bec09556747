use chakra_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("hand script parse error: {0}")]
    ScriptParse(#[from] toml::de::Error),

    #[error("invalid hand script: {0}")]
    InvalidScript(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
