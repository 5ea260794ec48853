//! The gated conversation controller.
//!
//! A `Conversation` owns the history, runs the locked/unlocked gate,
//! drives the send protocol with key failover, and reports everything the
//! user should see as [`DisplayIntent`]s on a channel. It never touches a
//! screen itself.

mod controller;
mod script;
mod types;

#[cfg(test)]
mod tests;

pub use controller::Conversation;
pub use script::{ConversationScript, Notices};
pub use types::{Author, DisplayIntent, GateState, NoticeKind, SessionStatus, SubmitOutcome};
