//! Configuration schema types for gatechat.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults below; the secret and the
//! API key pool have no usable default and must be configured.

mod access;
mod attachments;
mod gemini;
mod notices;
mod persona;
mod system;

pub use access::*;
pub use attachments::*;
pub use gemini::*;
pub use notices::*;
pub use persona::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for gatechat.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChatConfig {
    pub access: AccessConfig,
    pub gemini: GeminiSection,
    pub persona: PersonaConfig,
    pub notices: NoticesConfig,
    pub attachments: AttachmentsConfig,
    pub logging: LoggingConfig,
}
