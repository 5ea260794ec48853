//! Gatechat configuration system.
//!
//! Provides TOML-based configuration with environment overrides and full
//! validation. All config sections use sensible defaults so partial configs
//! work out of the box; only the access secret and the API keys have to be
//! supplied.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gatechat_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("model: {}", config.gemini.model);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ChatConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use gatechat_common::ConfigError;

/// Load, override, and validate the configuration.
///
/// With `path` set, the file must exist. Without it, `config.toml` is read from
/// the OS config directory and a commented default is created if missing.
/// `GATECHAT_*` environment variables are applied before validation.
pub fn load_config(path: Option<&Path>) -> Result<ChatConfig, ConfigError> {
    let mut config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };

    env::apply_overrides(&mut config, |name| std::env::var(name).ok());

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with secrets masked.
pub fn config_to_json(config: &ChatConfig) -> String {
    let mut redacted = config.clone();
    if !redacted.access.valid_secret.is_empty() {
        redacted.access.valid_secret = "[REDACTED]".into();
    }
    redacted.gemini.api_keys = redacted
        .gemini
        .api_keys
        .iter()
        .map(|_| "[REDACTED]".to_string())
        .collect();
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
