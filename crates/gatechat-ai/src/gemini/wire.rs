//! `generateContent` request and response bodies.

use serde::{Deserialize, Serialize};

use crate::{AiError, ConversationTurn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<ConversationTurn>,
}

/// Only the fields the gateway reads; everything else in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// A response holding a single candidate with one text part.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![ResponsePart {
                        text: Some(text.into()),
                    }],
                },
            }],
        }
    }

    /// The first candidate's first part text, or an empty string when that
    /// part carries no text. Fails when there are no candidates at all.
    pub fn into_first_text(self) -> Result<String, AiError> {
        let first = self
            .candidates
            .into_iter()
            .next()
            .ok_or(AiError::EmptyResponse)?;
        Ok(first
            .content
            .parts
            .into_iter()
            .next()
            .and_then(|p| p.text)
            .unwrap_or_default())
    }
}
