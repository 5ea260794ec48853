//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gemini::{GenerateContentRequest, GenerateContentResponse, Transport};
use crate::AiError;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub model: String,
    pub api_key: String,
    pub request: GenerateContentRequest,
}

#[derive(Debug, Clone)]
enum Behaviour {
    Reply(String),
    Fail(u16),
    Empty,
    Hang,
}

/// A transport whose answer depends only on the key used.
///
/// Unscripted keys reply with `"ok"`. Every call is recorded.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    behaviour: Mutex<HashMap<String, Behaviour>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_for(&self, key: &str, text: &str) {
        self.set(key, Behaviour::Reply(text.to_string()));
    }

    /// Make `key` answer with HTTP 503.
    pub fn fail_key(&self, key: &str) {
        self.set(key, Behaviour::Fail(503));
    }

    pub fn empty_for(&self, key: &str) {
        self.set(key, Behaviour::Empty);
    }

    /// Make `key` never answer.
    pub fn hang_for(&self, key: &str) {
        self.set(key, Behaviour::Hang);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys_used(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.api_key).collect()
    }

    fn set(&self, key: &str, behaviour: Behaviour) {
        self.behaviour
            .lock()
            .unwrap()
            .insert(key.to_string(), behaviour);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            api_key: api_key.to_string(),
            request: request.clone(),
        });

        let behaviour = self.behaviour.lock().unwrap().get(api_key).cloned();
        match behaviour.unwrap_or_else(|| Behaviour::Reply("ok".into())) {
            Behaviour::Reply(text) => Ok(GenerateContentResponse::with_text(text)),
            Behaviour::Fail(status) => Err(AiError::Transport {
                status,
                body: format!("{{\"error\":\"key {api_key} unavailable\"}}"),
            }),
            Behaviour::Empty => Ok(GenerateContentResponse::default()),
            Behaviour::Hang => std::future::pending().await,
        }
    }
}
