//! Google Gemini gateway.
//!
//! Builds `generateContent` requests from the conversation history or a
//! fresh image scaffold and sends them with the current key of a
//! [`KeyPool`](crate::KeyPool).

mod config;
mod gateway;
mod transport;
mod wire;

pub use config::GatewayConfig;
pub use gateway::GeminiGateway;
pub use transport::{HttpTransport, Transport};
pub use wire::{
    Candidate, CandidateContent, GenerateContentRequest, GenerateContentResponse, ResponsePart,
};
