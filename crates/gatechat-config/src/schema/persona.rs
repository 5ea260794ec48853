//! Persona scaffold and canned conversation text.

use serde::{Deserialize, Serialize};

/// Text that seeds and shapes every conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Sent as the first user turn of every request.
    pub preamble: String,
    /// Canned model reply that follows the preamble in the chat history.
    pub greeting: String,
    /// Canned model reply that follows the preamble in image requests.
    pub multimodal_ack: String,
    /// Prompt used when images are sent without any text.
    pub image_prompt: String,
    pub developer_question: String,
    pub developer_info: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            preamble: "You are Gatechat, a concise and friendly assistant. \
                       Answer plainly and use fenced code blocks for code."
                .into(),
            greeting: "Hello, welcome to Gatechat.".into(),
            multimodal_ack: "Understood. Which image should I look at?".into(),
            image_prompt: "Describe and analyse this image.".into(),
            developer_question: "Who is your developer?".into(),
            developer_info: "I am Gatechat, built and maintained by the Gatechat developers."
                .into(),
        }
    }
}
