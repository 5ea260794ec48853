pub mod errors;

pub use errors::{ConfigError, GatechatError, PlatformError};

pub type Result<T> = std::result::Result<T, GatechatError>;
