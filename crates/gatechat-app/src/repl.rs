//! The input loop: reads lines, dispatches commands, refreshes the status bar.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gatechat_ai::attachments::FsAttachment;
use gatechat_ai::conversation::NoticeKind;
use gatechat_ai::{AttachmentFile, AttachmentProvider, DisplayIntent, PendingAttachments};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval_at, Instant};

use crate::bootstrap::Session;
use crate::commands::{Command, HELP};

const STATUS_REFRESH: Duration = Duration::from_secs(60);

pub async fn run(session: Session, display: UnboundedSender<DisplayIntent>) -> std::io::Result<()> {
    let Session {
        mut conversation,
        attachments,
    } = session;
    let tray = Tray {
        attachments,
        display,
    };

    conversation.restore_session();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status_tick = interval_at(Instant::now() + STATUS_REFRESH, STATUS_REFRESH);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Submit(text) => {
                        // Awaited inline, so no input is read while a send is in flight.
                        let outcome = conversation.submit(&text).await;
                        tracing::debug!(?outcome, "submit finished");
                    }
                    Command::Developer => {
                        conversation.ask_developer();
                    }
                    Command::Status => conversation.refresh_status(),
                    Command::Attach(Some(path)) => tray.attach(&path),
                    Command::Attach(None) => tray.list(),
                    Command::Detach(prefix) => tray.detach(&prefix),
                    Command::Clear => tray.clear(),
                    Command::Help => tray.toast(HELP),
                }
            }
            _ = status_tick.tick() => conversation.refresh_status(),
        }
    }

    tracing::info!("input loop finished");
    Ok(())
}

/// Attachment commands, answered with toasts.
struct Tray {
    attachments: Arc<PendingAttachments>,
    display: UnboundedSender<DisplayIntent>,
}

impl Tray {
    fn attach(&self, path: &Path) {
        let file = match FsAttachment::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot attach file");
                self.toast(&format!("Cannot open {}: {e}", path.display()));
                return;
            }
        };
        let name = file.name().to_string();
        match self.attachments.add(Arc::new(file)) {
            Ok(id) => self.toast(&format!("Attached {name} [{}]", short_id(&id.to_string()))),
            Err(rejection) => self.toast(&rejection.to_string()),
        }
    }

    fn list(&self) {
        let pending = self.attachments.summaries();
        if pending.is_empty() {
            self.toast("No files attached.");
            return;
        }
        let listing = pending
            .iter()
            .map(|p| {
                format!(
                    "[{}] {} ({}, {} KB)",
                    short_id(&p.id.to_string()),
                    p.name,
                    p.mime_type,
                    p.size.div_ceil(1024)
                )
            })
            .collect::<Vec<_>>()
            .join("\n  ");
        self.toast(&listing);
    }

    fn detach(&self, prefix: &str) {
        if prefix.is_empty() {
            self.toast("Usage: /detach <id>");
            return;
        }
        let found = self
            .attachments
            .summaries()
            .into_iter()
            .find(|p| p.id.to_string().starts_with(prefix));
        match found {
            Some(p) if self.attachments.remove(p.id) => self.toast(&format!("Removed {}", p.name)),
            _ => self.toast(&format!("No attachment matches {prefix}")),
        }
    }

    fn clear(&self) {
        self.attachments.clear_pending_files();
        self.toast("Attachments cleared.");
    }

    fn toast(&self, text: &str) {
        let _ = self.display.send(DisplayIntent::ShowNotice {
            kind: NoticeKind::Toast,
            text: text.to_string(),
        });
    }
}

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}
