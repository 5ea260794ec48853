//! Request building and the two send paths.

use std::sync::Arc;

use tracing::debug;

use super::config::GatewayConfig;
use super::transport::Transport;
use super::wire::GenerateContentRequest;
use crate::attachments::{encode_attachment, AttachmentFile};
use crate::key_pool::KeyPool;
use crate::{AiError, ConversationTurn, MessagePart, Role};

/// Sends conversations to Gemini using the current key of its pool.
///
/// A send never rotates the pool by itself; failover is the caller's
/// decision (see [`Conversation`](crate::Conversation)).
pub struct GeminiGateway {
    config: GatewayConfig,
    keys: KeyPool,
    transport: Arc<dyn Transport>,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig, keys: KeyPool, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            keys,
            transport,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn current_key(&self) -> &str {
        self.keys.current()
    }

    pub fn key_index(&self) -> usize {
        self.keys.index()
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Switch to the next key in the pool and return it.
    pub fn rotate(&mut self) -> &str {
        self.keys.rotate()
    }

    /// Send the history verbatim and return the reply text.
    pub async fn send_text(&self, history: &[ConversationTurn]) -> Result<String, AiError> {
        let request = GenerateContentRequest {
            contents: history.to_vec(),
        };
        self.send(&request).await
    }

    /// Send `message` plus images on a fresh persona scaffold.
    ///
    /// The caller's history is not included: the request is always the
    /// persona turn, the canned acknowledgement, and one user turn holding
    /// the text and every image.
    pub async fn send_multimodal(
        &self,
        message: &str,
        files: &[Arc<dyn AttachmentFile>],
    ) -> Result<String, AiError> {
        let request = self.build_multimodal_request(message, files).await?;
        self.send(&request).await
    }

    pub(crate) async fn build_multimodal_request(
        &self,
        message: &str,
        files: &[Arc<dyn AttachmentFile>],
    ) -> Result<GenerateContentRequest, AiError> {
        let text = if message.is_empty() {
            self.config.image_prompt.clone()
        } else {
            message.to_string()
        };

        let mut parts = Vec::with_capacity(files.len() + 1);
        parts.push(MessagePart::Text(text));
        for file in files {
            parts.push(MessagePart::InlineData(encode_attachment(file.as_ref()).await?));
        }

        Ok(GenerateContentRequest {
            contents: vec![
                ConversationTurn::user(self.config.persona.clone()),
                ConversationTurn::model(self.config.multimodal_ack.clone()),
                ConversationTurn {
                    role: Role::User,
                    parts,
                },
            ],
        })
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<String, AiError> {
        debug!(key_index = self.keys.index(), "sending generateContent");
        let response = self
            .transport
            .generate_content(&self.config.model, self.keys.current(), request)
            .await?;
        response.into_first_text()
    }
}
