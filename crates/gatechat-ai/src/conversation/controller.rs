//! Conversation state, the gate, and the send protocol.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use super::script::ConversationScript;
use super::types::{
    Author, BusyGuard, DisplayIntent, GateState, NoticeKind, SessionStatus, SubmitOutcome,
};
use crate::access::SessionStore;
use crate::attachments::AttachmentProvider;
use crate::gemini::GeminiGateway;
use crate::segment::segment_text;
use crate::{AiError, ConversationTurn};

/// A single user's gated chat session.
pub struct Conversation {
    /// API-bound history, seeded with the persona and greeting.
    pub(super) history: Vec<ConversationTurn>,
    pub(super) gate: GateState,
    pub(super) gateway: GeminiGateway,
    pub(super) store: SessionStore,
    pub(super) attachments: Arc<dyn AttachmentProvider>,
    pub(super) script: ConversationScript,
    pub(super) display: UnboundedSender<DisplayIntent>,
    /// Set while a submit is in flight. The guard holds its own handle so it
    /// can clear the flag while `send` borrows `self` mutably, and on drop
    /// when a caller abandons the submit future mid-send.
    pub(super) busy: Arc<AtomicBool>,
}

impl Conversation {
    pub fn new(
        gateway: GeminiGateway,
        store: SessionStore,
        attachments: Arc<dyn AttachmentProvider>,
        script: ConversationScript,
        display: UnboundedSender<DisplayIntent>,
    ) -> Self {
        let history = vec![
            ConversationTurn::user(script.preamble.clone()),
            ConversationTurn::model(script.greeting.clone()),
        ];
        Self {
            history,
            gate: GateState::Locked,
            gateway,
            store,
            attachments,
            script,
            display,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn gateway(&self) -> &GeminiGateway {
        &self.gateway
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Open the gate if a valid credential is stored.
    ///
    /// Called once at startup. An invalid record is evicted by the check.
    pub fn restore_session(&mut self) -> GateState {
        if self.store.is_valid() {
            info!("stored credential valid, gate unlocked");
            self.gate = GateState::Unlocked;
            self.emit(DisplayIntent::SetGate(GateState::Unlocked));
            let text = self.script.notices.restored.clone();
            self.notice(NoticeKind::Confirmation, text);
        } else {
            self.emit(DisplayIntent::SetGate(GateState::Locked));
        }
        self.refresh_status();
        self.gate
    }

    /// Gate state plus time left on the stored credential.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            gate: self.gate,
            remaining: self.store.remaining_time(),
        }
    }

    /// Emit the current status for the status bar.
    pub fn refresh_status(&self) {
        self.emit(DisplayIntent::Status(self.status()));
    }

    /// Handle one line of user input.
    ///
    /// While locked the input is a candidate secret. While unlocked it is a
    /// chat message, sent with any pending attachments.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("submit ignored, a send is already in flight");
            return SubmitOutcome::Busy;
        };

        let message = input.trim();
        match self.gate {
            GateState::Locked => {
                if message.is_empty() {
                    return SubmitOutcome::Ignored;
                }
                self.try_unlock(message)
            }
            GateState::Unlocked => {
                let has_files = self.attachments.has_pending_files();
                if message.is_empty() && !has_files {
                    return SubmitOutcome::Ignored;
                }
                self.send(message, has_files).await
            }
        }
    }

    /// Answer the fixed developer question without calling the API.
    ///
    /// Returns false (and only shows a hint) while locked.
    pub fn ask_developer(&mut self) -> bool {
        if self.gate == GateState::Locked {
            let hint = self.script.notices.locked_developer.clone();
            self.show_message(Author::Model, &hint);
            return false;
        }

        let question = self.script.developer_question.clone();
        let answer = self.script.developer_info.clone();
        self.history.push(ConversationTurn::user(question.clone()));
        self.history.push(ConversationTurn::model(answer.clone()));
        self.show_message(Author::User, &question);
        self.show_message(Author::Model, &answer);
        true
    }

    /// The attempt is echoed to the transcript only; it never enters the
    /// API-bound history.
    fn try_unlock(&mut self, candidate: &str) -> SubmitOutcome {
        self.show_message(Author::User, candidate);

        if !self.store.matches_secret(candidate) {
            info!("unlock attempt rejected");
            let text = self.script.notices.rejected.clone();
            self.show_message(Author::Model, &text);
            return SubmitOutcome::Rejected;
        }

        self.store.save(candidate);
        self.gate = GateState::Unlocked;
        info!("gate unlocked");

        self.emit(DisplayIntent::SetGate(GateState::Unlocked));
        let text = self.script.notices.unlocked.clone();
        self.notice(NoticeKind::Confirmation, text);
        self.refresh_status();
        SubmitOutcome::Unlocked
    }

    async fn send(&mut self, message: &str, has_files: bool) -> SubmitOutcome {
        let user_text = if message.is_empty() {
            self.script.image_prompt.clone()
        } else {
            message.to_string()
        };
        self.history.push(ConversationTurn::user(user_text.clone()));
        self.show_message(Author::User, &user_text);
        self.emit(DisplayIntent::ShowTyping);

        let result = if has_files {
            self.send_with_attachments(message).await
        } else {
            self.send_text_with_failover().await
        };

        self.emit(DisplayIntent::HideTyping);

        match result {
            Ok(reply) => {
                self.history.push(ConversationTurn::model(reply.clone()));
                self.show_message(Author::Model, &reply);
                SubmitOutcome::Replied(reply)
            }
            Err(e) => {
                error!(error = %e, "send failed");
                let text = self.script.notices.send_failed.clone();
                self.history.push(ConversationTurn::model(text.clone()));
                self.show_message(Author::Model, &text);
                SubmitOutcome::Failed
            }
        }
    }

    /// One attempt with the current key; attachments are cleared only on
    /// success so the user can retry.
    async fn send_with_attachments(&mut self, message: &str) -> Result<String, AiError> {
        let files = self.attachments.list_pending_files();
        debug!(files = files.len(), "sending message with attachments");
        let reply = self.gateway.send_multimodal(message, &files).await?;
        self.attachments.clear_pending_files();
        Ok(reply)
    }

    /// Try each key of the pool at most once.
    ///
    /// The pool only rotates ahead of a re-attempt, so after an exhausted
    /// send the next one starts on the last key tried.
    async fn send_text_with_failover(&mut self) -> Result<String, AiError> {
        let attempts = self.gateway.key_count();
        let mut last = None;

        for attempt in 1..=attempts {
            match self.gateway.send_text(&self.history).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    warn!(
                        attempt,
                        attempts,
                        key_index = self.gateway.key_index(),
                        error = %e,
                        "text send failed"
                    );
                    if attempt < attempts {
                        self.gateway.rotate();
                    }
                    last = Some(Box::new(e));
                }
            }
        }

        Err(AiError::AllKeysExhausted { attempts, last })
    }

    fn show_message(&self, author: Author, text: &str) {
        self.emit(DisplayIntent::AppendMessage {
            author,
            segments: segment_text(text),
        });
    }

    fn notice(&self, kind: NoticeKind, text: String) {
        self.emit(DisplayIntent::ShowNotice { kind, text });
    }

    fn emit(&self, intent: DisplayIntent) {
        // The renderer may already be gone during shutdown.
        let _ = self.display.send(intent);
    }
}
