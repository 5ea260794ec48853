//! Wires the configured components into a conversation.

use std::sync::Arc;
use std::time::Duration;

use gatechat_ai::attachments::AttachmentLimits;
use gatechat_ai::conversation::Notices;
use gatechat_ai::{
    Conversation, ConversationScript, DisplayIntent, GatewayConfig, GeminiGateway, HttpTransport,
    KeyPool, PendingAttachments, SessionStore, Transport,
};
use gatechat_common::GatechatError;
use gatechat_config::ChatConfig;
use gatechat_platform::{Clock, FileStore, KeyValueStore, SystemClock};
use tokio::sync::mpsc::UnboundedSender;

/// Everything the input loop drives.
pub struct Session {
    pub conversation: Conversation,
    pub attachments: Arc<PendingAttachments>,
}

/// Build a session backed by the real network, disk, and clock.
pub fn build(
    config: &ChatConfig,
    display: UnboundedSender<DisplayIntent>,
) -> gatechat_common::Result<Session> {
    let gateway_config = gateway_config(config);
    let transport = HttpTransport::new(
        gateway_config.base_url.clone(),
        gateway_config.connect_timeout,
        gateway_config.request_timeout,
    )
    .map_err(|e| GatechatError::Ai(e.to_string()))?;

    let storage = FileStore::open_default()?;
    tracing::info!(path = %storage.path().display(), "credential storage opened");

    assemble(
        config,
        Arc::new(transport),
        Arc::new(storage),
        Arc::new(SystemClock),
        display,
    )
}

/// Build a session from explicit seams.
pub fn assemble(
    config: &ChatConfig,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    display: UnboundedSender<DisplayIntent>,
) -> gatechat_common::Result<Session> {
    let keys =
        KeyPool::new(config.gemini.api_keys.clone()).map_err(|e| GatechatError::Ai(e.to_string()))?;
    tracing::info!(keys = keys.len(), model = %config.gemini.model, "gemini gateway ready");
    let gateway = GeminiGateway::new(gateway_config(config), keys, transport);

    let store = SessionStore::new(
        storage,
        clock,
        config.access.valid_secret.clone(),
        config.access.expiry_hours,
    );

    let attachments = Arc::new(PendingAttachments::new(attachment_limits(config)));
    let conversation = Conversation::new(
        gateway,
        store,
        attachments.clone(),
        conversation_script(config),
        display,
    );

    Ok(Session {
        conversation,
        attachments,
    })
}

fn gateway_config(config: &ChatConfig) -> GatewayConfig {
    let gemini = &config.gemini;
    GatewayConfig::new(config.persona.preamble.clone())
        .with_model(gemini.model.clone())
        .with_base_url(gemini.base_url.clone())
        .with_timeouts(
            Duration::from_secs(gemini.connect_timeout_secs),
            Duration::from_secs(gemini.request_timeout_secs),
        )
        .with_multimodal_ack(config.persona.multimodal_ack.clone())
        .with_image_prompt(config.persona.image_prompt.clone())
}

fn attachment_limits(config: &ChatConfig) -> AttachmentLimits {
    AttachmentLimits {
        max_file_size: config.attachments.max_file_size,
        allowed_mime_prefix: config.attachments.allowed_mime_prefix.clone(),
    }
}

fn conversation_script(config: &ChatConfig) -> ConversationScript {
    let persona = &config.persona;
    let notices = &config.notices;
    ConversationScript {
        preamble: persona.preamble.clone(),
        greeting: persona.greeting.clone(),
        image_prompt: persona.image_prompt.clone(),
        developer_question: persona.developer_question.clone(),
        developer_info: persona.developer_info.clone(),
        notices: Notices {
            unlocked: notices.unlocked.clone(),
            restored: notices.restored.clone(),
            rejected: notices.rejected.clone(),
            locked_developer: notices.locked_developer.clone(),
            send_failed: notices.send_failed.clone(),
        },
    }
}
