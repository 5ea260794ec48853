use std::sync::Arc;

use gatechat_platform::{KeyValueStore, ManualClock, MemoryStore};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use super::*;
use crate::access::{SessionStore, CREDENTIAL_STORAGE_KEY};
use crate::attachments::{AttachmentFile, AttachmentProvider, MemoryAttachment, PendingAttachments};
use crate::gemini::{GatewayConfig, GeminiGateway};
use crate::key_pool::KeyPool;
use crate::segment::TextSegment;
use crate::testing::ScriptedTransport;
use crate::{ConversationTurn, MessagePart, Role};

const SECRET: &str = "061125";
const START: i64 = 1_700_000_000_000;

struct Harness {
    conversation: Conversation,
    transport: Arc<ScriptedTransport>,
    storage: Arc<MemoryStore>,
    clock: ManualClock,
    attachments: Arc<PendingAttachments>,
    display: UnboundedReceiver<DisplayIntent>,
}

impl Harness {
    fn new(keys: &[&str]) -> Self {
        Self::with_storage(keys, Arc::new(MemoryStore::new()), ManualClock::new(START))
    }

    fn with_storage(keys: &[&str], storage: Arc<MemoryStore>, clock: ManualClock) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let pool = KeyPool::new(keys.iter().map(|k| k.to_string()).collect()).unwrap();
        let gateway = GeminiGateway::new(
            GatewayConfig::new("persona")
                .with_model("test-model")
                .with_multimodal_ack("ack")
                .with_image_prompt("describe"),
            pool,
            transport.clone(),
        );
        let store = SessionStore::new(storage.clone(), Arc::new(clock.clone()), SECRET, 24);
        let attachments = Arc::new(PendingAttachments::default());
        let (tx, rx) = unbounded_channel();
        let script = ConversationScript {
            preamble: "persona".into(),
            greeting: "welcome".into(),
            image_prompt: "describe".into(),
            ..ConversationScript::default()
        };
        let conversation = Conversation::new(gateway, store, attachments.clone(), script, tx);
        Self {
            conversation,
            transport,
            storage,
            clock,
            attachments,
            display: rx,
        }
    }

    async fn unlocked(keys: &[&str]) -> Self {
        let mut h = Self::new(keys);
        assert_eq!(h.conversation.submit(SECRET).await, SubmitOutcome::Unlocked);
        h.drain();
        h
    }

    fn drain(&mut self) -> Vec<DisplayIntent> {
        let mut out = Vec::new();
        while let Ok(intent) = self.display.try_recv() {
            out.push(intent);
        }
        out
    }

    fn attach(&self, name: &str) {
        self.attachments
            .add(Arc::new(MemoryAttachment::new(name, "image/png", vec![1, 2, 3])))
            .unwrap();
    }

    fn texts(&self) -> Vec<(Role, String)> {
        self.conversation
            .history()
            .iter()
            .map(|t| (t.role, t.text().unwrap_or_default().to_string()))
            .collect()
    }
}

fn message(author: Author, text: &str) -> DisplayIntent {
    DisplayIntent::AppendMessage {
        author,
        segments: vec![TextSegment::plain(text)],
    }
}

// -- gate --

#[tokio::test]
async fn starts_locked_with_seed_history() {
    let h = Harness::new(&["k0"]);
    assert_eq!(h.conversation.gate(), GateState::Locked);
    assert_eq!(
        h.conversation.history(),
        &[
            ConversationTurn::user("persona"),
            ConversationTurn::model("welcome")
        ]
    );
}

#[tokio::test]
async fn correct_secret_unlocks_and_persists() {
    let mut h = Harness::new(&["k0"]);
    let outcome = h.conversation.submit("  061125 \n").await;

    assert_eq!(outcome, SubmitOutcome::Unlocked);
    assert_eq!(h.conversation.gate(), GateState::Unlocked);

    let record = h.conversation.store().read().unwrap();
    assert_eq!(record.secret, SECRET);
    assert_eq!(record.issued_at, START);

    let intents = h.drain();
    assert_eq!(intents[0], message(Author::User, SECRET));
    assert_eq!(intents[1], DisplayIntent::SetGate(GateState::Unlocked));
    assert!(matches!(
        &intents[2],
        DisplayIntent::ShowNotice { kind: NoticeKind::Confirmation, text } if text.starts_with("Key verified")
    ));
    assert!(matches!(
        intents[3],
        DisplayIntent::Status(SessionStatus { gate: GateState::Unlocked, remaining: Some(_) })
    ));

    // Unlock attempts never reach the API-bound history or the network.
    assert_eq!(h.conversation.history().len(), 2);
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn wrong_secret_stays_locked_and_persists_nothing() {
    let mut h = Harness::new(&["k0"]);
    let outcome = h.conversation.submit("123456").await;

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(h.conversation.gate(), GateState::Locked);
    assert_eq!(h.storage.get(CREDENTIAL_STORAGE_KEY).unwrap(), None);
    assert_eq!(
        h.drain(),
        vec![
            message(Author::User, "123456"),
            message(Author::Model, "Wrong key! Please try again."),
        ]
    );
    assert_eq!(h.conversation.history().len(), 2);
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn locked_input_is_never_sent_as_chat() {
    let mut h = Harness::new(&["k0"]);
    h.attach("a.png");
    assert_eq!(h.conversation.submit("hello there").await, SubmitOutcome::Rejected);
    assert!(h.transport.calls().is_empty());
    assert!(h.attachments.has_pending_files());
}

#[tokio::test]
async fn empty_input_while_locked_is_ignored() {
    let mut h = Harness::new(&["k0"]);
    assert_eq!(h.conversation.submit("   ").await, SubmitOutcome::Ignored);
    assert!(h.drain().is_empty());
}

#[tokio::test]
async fn restore_session_with_valid_credential_unlocks() {
    let storage = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(START);
    {
        let mut first = Harness::with_storage(&["k0"], storage.clone(), clock.clone());
        first.conversation.submit(SECRET).await;
    }

    clock.advance_hours(5.5);
    let mut h = Harness::with_storage(&["k0"], storage, clock);
    assert_eq!(h.conversation.restore_session(), GateState::Unlocked);

    let intents = h.drain();
    assert_eq!(intents[0], DisplayIntent::SetGate(GateState::Unlocked));
    assert!(matches!(
        &intents[1],
        DisplayIntent::ShowNotice { kind: NoticeKind::Confirmation, text } if text.starts_with("Key detected")
    ));
    assert_eq!(
        h.conversation.status().remaining,
        Some(crate::RemainingTime { hours: 18, minutes: 30 })
    );
}

#[tokio::test]
async fn restore_session_after_expiry_stays_locked_and_evicts() {
    let storage = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(START);
    {
        let mut first = Harness::with_storage(&["k0"], storage.clone(), clock.clone());
        first.conversation.submit(SECRET).await;
    }

    clock.advance_hours(24.0);
    let mut h = Harness::with_storage(&["k0"], storage.clone(), clock);
    assert_eq!(h.conversation.restore_session(), GateState::Locked);
    assert_eq!(storage.get(CREDENTIAL_STORAGE_KEY).unwrap(), None);
    assert_eq!(
        h.drain(),
        vec![
            DisplayIntent::SetGate(GateState::Locked),
            DisplayIntent::Status(SessionStatus {
                gate: GateState::Locked,
                remaining: None
            }),
        ]
    );
}

#[tokio::test]
async fn unlocked_gate_outlives_expiry_within_session() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.clock.advance_hours(30.0);

    assert_eq!(h.conversation.gate(), GateState::Unlocked);
    assert_eq!(h.conversation.status().remaining, None);
    assert!(matches!(
        h.conversation.submit("still here?").await,
        SubmitOutcome::Replied(_)
    ));
}

// -- text sends --

#[tokio::test]
async fn text_send_appends_user_and_model_turns() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.transport.reply_for("k0", "Here:\n```rust\nfn main() {}\n```");

    let outcome = h.conversation.submit("show me code").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Replied("Here:\n```rust\nfn main() {}\n```".into())
    );

    // The full history went out, ending with the new user turn.
    let sent = &h.transport.calls()[0].request.contents;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2], ConversationTurn::user("show me code"));

    assert_eq!(
        h.drain(),
        vec![
            message(Author::User, "show me code"),
            DisplayIntent::ShowTyping,
            DisplayIntent::HideTyping,
            DisplayIntent::AppendMessage {
                author: Author::Model,
                segments: vec![
                    TextSegment::plain("Here:\n"),
                    TextSegment::code(Some("rust"), "fn main() {}"),
                ],
            },
        ]
    );
}

#[tokio::test]
async fn history_grows_by_two_per_exchange() {
    let mut h = Harness::unlocked(&["k0"]).await;
    for n in 1..=4 {
        let outcome = h.conversation.submit(&format!("question {n}")).await;
        assert!(matches!(outcome, SubmitOutcome::Replied(_)));
        assert_eq!(h.conversation.history().len(), 2 + 2 * n);
    }

    let roles: Vec<Role> = h.conversation.history().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::User,
            Role::Model,
            Role::User,
            Role::Model,
            Role::User,
            Role::Model,
            Role::User,
            Role::Model,
            Role::User,
            Role::Model,
        ]
    );
    assert_eq!(h.texts()[8], (Role::User, "question 4".to_string()));
}

#[tokio::test]
async fn failover_tries_next_keys_until_success() {
    let mut h = Harness::unlocked(&["k0", "k1", "k2"]).await;
    h.transport.fail_key("k0");
    h.transport.fail_key("k1");
    h.transport.reply_for("k2", "third time lucky");

    let outcome = h.conversation.submit("hello").await;

    assert_eq!(outcome, SubmitOutcome::Replied("third time lucky".into()));
    assert_eq!(h.transport.keys_used(), vec!["k0", "k1", "k2"]);
    assert_eq!(h.conversation.gateway().current_key(), "k2");
    assert_eq!(
        h.texts()[2..],
        [
            (Role::User, "hello".to_string()),
            (Role::Model, "third time lucky".to_string())
        ]
    );
}

#[tokio::test]
async fn working_key_is_kept_for_next_send() {
    let mut h = Harness::unlocked(&["k0", "k1"]).await;
    h.transport.fail_key("k0");

    h.conversation.submit("one").await;
    h.conversation.submit("two").await;

    assert_eq!(h.transport.keys_used(), vec!["k0", "k1", "k1"]);
}

#[tokio::test]
async fn exhausted_pool_shows_generic_failure() {
    let mut h = Harness::unlocked(&["k0", "k1", "k2"]).await;
    for key in ["k0", "k1", "k2"] {
        h.transport.fail_key(key);
    }

    let outcome = h.conversation.submit("anyone?").await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(h.transport.calls().len(), 3);
    // No rotation after the final attempt.
    assert_eq!(h.conversation.gateway().key_index(), 2);

    let generic = "Sorry, something went wrong. Please try again.";
    assert_eq!(
        h.texts()[2..],
        [
            (Role::User, "anyone?".to_string()),
            (Role::Model, generic.to_string())
        ]
    );

    let intents = h.drain();
    assert_eq!(intents.last(), Some(&message(Author::Model, generic)));
    // Raw transport detail never reaches the display.
    for intent in &intents {
        if let DisplayIntent::AppendMessage { segments, .. } = intent {
            assert!(segments.iter().all(|s| !s.content().contains("503")));
            assert!(segments.iter().all(|s| !s.content().contains("unavailable")));
        }
    }
}

#[tokio::test]
async fn send_after_exhaustion_starts_on_last_key_tried() {
    let mut h = Harness::unlocked(&["k0", "k1", "k2"]).await;
    for key in ["k0", "k1", "k2"] {
        h.transport.fail_key(key);
    }

    assert_eq!(h.conversation.submit("first").await, SubmitOutcome::Failed);
    h.transport.reply_for("k2", "back");
    assert_eq!(
        h.conversation.submit("second").await,
        SubmitOutcome::Replied("back".into())
    );

    assert_eq!(h.transport.keys_used(), vec!["k0", "k1", "k2", "k2"]);
    assert_eq!(h.conversation.gateway().key_index(), 2);
}

#[tokio::test]
async fn empty_candidates_count_as_failure_for_failover() {
    let mut h = Harness::unlocked(&["k0", "k1"]).await;
    h.transport.empty_for("k0");
    h.transport.reply_for("k1", "fine");

    assert_eq!(
        h.conversation.submit("hi").await,
        SubmitOutcome::Replied("fine".into())
    );
    assert_eq!(h.transport.keys_used(), vec!["k0", "k1"]);
}

#[tokio::test]
async fn empty_input_while_unlocked_is_ignored() {
    let mut h = Harness::unlocked(&["k0"]).await;
    assert_eq!(h.conversation.submit("").await, SubmitOutcome::Ignored);
    assert_eq!(h.conversation.submit(" \n\t").await, SubmitOutcome::Ignored);
    assert!(h.transport.calls().is_empty());
    assert!(h.drain().is_empty());
}

// -- attachments --

#[tokio::test]
async fn attachments_use_multimodal_path_and_are_cleared() {
    let mut h = Harness::unlocked(&["k0", "k1"]).await;
    h.transport.reply_for("k0", "a red square");
    h.attach("square.png");

    let outcome = h.conversation.submit("what is it?").await;
    assert_eq!(outcome, SubmitOutcome::Replied("a red square".into()));
    assert!(!h.attachments.has_pending_files());

    // Fresh scaffold, not the accumulated history.
    let request = &h.transport.calls()[0].request;
    assert_eq!(request.contents.len(), 3);
    assert_eq!(request.contents[0], ConversationTurn::user("persona"));
    assert_eq!(request.contents[1], ConversationTurn::model("ack"));
    assert!(matches!(
        &request.contents[2].parts[1],
        MessagePart::InlineData(d) if d.mime_type == "image/png" && d.data == "AQID"
    ));

    // History keeps text only.
    let last_user = &h.conversation.history()[2];
    assert_eq!(last_user, &ConversationTurn::user("what is it?"));
    assert_eq!(h.conversation.history().len(), 4);
}

#[tokio::test]
async fn image_only_send_records_image_prompt() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.attach("photo.png");

    assert!(matches!(
        h.conversation.submit("").await,
        SubmitOutcome::Replied(_)
    ));
    assert_eq!(h.texts()[2], (Role::User, "describe".to_string()));
    assert_eq!(
        h.transport.calls()[0].request.contents[2].parts[0],
        MessagePart::Text("describe".into())
    );
}

#[tokio::test]
async fn multimodal_failure_does_not_retry_other_keys() {
    // Known asymmetry with the text path: a single attempt, no rotation.
    let mut h = Harness::unlocked(&["k0", "k1", "k2"]).await;
    h.transport.fail_key("k0");
    h.attach("a.png");

    let outcome = h.conversation.submit("look").await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(h.transport.keys_used(), vec!["k0"]);
    assert_eq!(h.conversation.gateway().key_index(), 0);
    assert!(h.attachments.has_pending_files());
    assert_eq!(
        h.texts().last().map(|(_, t)| t.clone()).as_deref(),
        Some("Sorry, something went wrong. Please try again.")
    );
}

#[tokio::test]
async fn unreadable_attachment_surfaces_generic_failure() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.attachments
        .add(Arc::new(crate::attachments::FsAttachment::with_metadata(
            "/nonexistent/gatechat/vanished.png",
            "image/png",
            4,
        )))
        .unwrap();

    assert_eq!(h.conversation.submit("see").await, SubmitOutcome::Failed);
    assert!(h.transport.calls().is_empty());
}

// -- developer shortcut --

#[tokio::test]
async fn developer_shortcut_answers_locally_when_unlocked() {
    let mut h = Harness::unlocked(&["k0"]).await;
    assert!(h.conversation.ask_developer());

    assert!(h.transport.calls().is_empty());
    assert_eq!(
        h.texts()[2..],
        [
            (Role::User, "Who is your developer?".to_string()),
            (
                Role::Model,
                "I am Gatechat, built and maintained by the Gatechat developers.".to_string()
            )
        ]
    );
    assert_eq!(h.drain().len(), 2);
}

#[tokio::test]
async fn developer_shortcut_is_gated() {
    let mut h = Harness::new(&["k0"]);
    assert!(!h.conversation.ask_developer());
    assert_eq!(h.conversation.history().len(), 2);
    assert_eq!(
        h.drain(),
        vec![message(Author::Model, "Enter your key first.")]
    );
}

// -- busy guard --

#[tokio::test]
async fn submit_while_busy_is_refused() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.conversation.busy.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(h.conversation.is_busy());

    assert_eq!(h.conversation.submit("hello").await, SubmitOutcome::Busy);
    assert!(h.transport.calls().is_empty());
    assert_eq!(h.conversation.history().len(), 2);
}

#[tokio::test]
async fn busy_flag_is_released_after_each_submit() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.transport.fail_key("k0");
    h.conversation.submit("fails").await;
    assert!(!h.conversation.is_busy());

    h.transport.reply_for("k0", "ok now");
    assert_eq!(
        h.conversation.submit("again").await,
        SubmitOutcome::Replied("ok now".into())
    );
}

#[tokio::test]
async fn abandoned_submit_releases_busy_flag() {
    let mut h = Harness::unlocked(&["k0"]).await;
    h.transport.hang_for("k0");

    let abandoned = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        h.conversation.submit("slow"),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(!h.conversation.is_busy());

    h.transport.reply_for("k0", "fast");
    assert_eq!(
        h.conversation.submit("again").await,
        SubmitOutcome::Replied("fast".into())
    );
}

#[test]
fn pending_files_seen_through_provider_trait() {
    let h = Harness::new(&["k0"]);
    h.attach("x.png");
    let provider: &dyn AttachmentProvider = h.attachments.as_ref();
    let files: Vec<Arc<dyn AttachmentFile>> = provider.list_pending_files();
    assert_eq!(files[0].name(), "x.png");
}
