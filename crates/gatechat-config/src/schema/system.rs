//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level, scoped to gatechat crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "gatechat=trace",
            LogLevel::Debug => "gatechat=debug",
            LogLevel::Info => "gatechat=info",
            LogLevel::Warn => "gatechat=warn",
            LogLevel::Error => "gatechat=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
