//! Conversation engine for gatechat.
//!
//! Provides:
//! - The passphrase gate and its persisted, expiring credential
//! - A Gemini gateway with a rotating key pool and image attachments
//! - Response segmentation into prose and fenced code
//! - The conversation controller that ties them together and emits
//!   display intents for a rendering adapter

pub mod access;
pub mod attachments;
pub mod conversation;
pub mod gemini;
pub mod key_pool;
pub mod segment;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{RemainingTime, SessionStore, StoredCredential};
pub use attachments::{AttachmentFile, AttachmentProvider, PendingAttachments};
pub use conversation::{Conversation, ConversationScript, DisplayIntent, GateState, SubmitOutcome};
pub use gemini::{GatewayConfig, GeminiGateway, HttpTransport, Transport};
pub use key_pool::KeyPool;
pub use segment::{segment_text, TextSegment};

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One piece of a turn. Serializes as `{"text": ..}` or `{"inline_data": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePart {
    Text(String),
    InlineData(InlineData),
}

impl MessagePart {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text(t) => Some(t),
            MessagePart::InlineData(_) => None,
        }
    }
}

/// One entry of the conversation history. `parts` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![MessagePart::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![MessagePart::Text(text.into())],
        }
    }

    /// Text of the first text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(MessagePart::as_text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Transport { status: u16, body: String },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No candidates in response")]
    EmptyResponse,
    #[error("Attachment encoding failed: {0}")]
    Encoding(String),
    #[error("All {attempts} API keys failed")]
    AllKeysExhausted {
        attempts: usize,
        last: Option<Box<AiError>>,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}
