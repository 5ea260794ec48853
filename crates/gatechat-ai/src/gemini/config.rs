//! Gemini gateway configuration.

use std::time::Duration;

/// Model selection and the persona scaffold used for image requests.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub model: String,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// First user turn of every image request.
    pub persona: String,
    /// Canned model turn that follows the persona in image requests.
    pub multimodal_ack: String,
    /// Text sent with images when the user typed nothing.
    pub image_prompt: String,
}

impl GatewayConfig {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            persona: persona.into(),
            multimodal_ack: "Understood. Which image should I look at?".to_string(),
            image_prompt: "Describe and analyse this image.".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn with_multimodal_ack(mut self, ack: impl Into<String>) -> Self {
        self.multimodal_ack = ack.into();
        self
    }

    pub fn with_image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.image_prompt = prompt.into();
        self
    }
}
