use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("path error: {0}")]
    PathError(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GatechatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("{0}")]
    Other(String),
}
