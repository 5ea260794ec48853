//! Renders display intents to the terminal.

use std::io::Write;
use std::time::Duration;

use gatechat_ai::conversation::{Author, NoticeKind, SessionStatus};
use gatechat_ai::segment::{parse_inline, Inline};
use gatechat_ai::{DisplayIntent, GateState, TextSegment};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Print intents until every sender is dropped.
pub async fn run(intents: UnboundedReceiver<DisplayIntent>) {
    run_to(intents, &mut std::io::stdout(), NoticeKind::lifetime).await;
}

/// Render into `out`, dismissing a notice once `lifetime` has passed.
///
/// Only a notice that is still the last thing printed gets dismissed; any
/// later output keeps it in the scrollback.
pub async fn run_to<W, L>(mut intents: UnboundedReceiver<DisplayIntent>, out: &mut W, lifetime: L)
where
    W: Write,
    L: Fn(NoticeKind) -> Duration,
{
    let mut shown: Option<ShownNotice> = None;

    loop {
        let next = match shown {
            Some(notice) => tokio::select! {
                intent = intents.recv() => intent,
                _ = tokio::time::sleep_until(notice.until) => {
                    emit(out, &dismiss(notice.lines));
                    shown = None;
                    continue;
                }
            },
            None => intents.recv().await,
        };
        let Some(intent) = next else { break };

        let text = render(&intent);
        shown = match &intent {
            DisplayIntent::ShowNotice { kind, .. } => Some(ShownNotice {
                until: Instant::now() + lifetime(*kind),
                lines: text.matches('\n').count(),
            }),
            _ => None,
        };
        emit(out, &text);
    }
}

#[derive(Clone, Copy)]
struct ShownNotice {
    until: Instant,
    lines: usize,
}

/// Move up over the last `lines` printed lines and erase them.
fn dismiss(lines: usize) -> String {
    if lines == 0 {
        return CLEAR_LINE.to_string();
    }
    format!("\x1b[{lines}A\x1b[J")
}

fn emit<W: Write>(out: &mut W, text: &str) {
    // A closed stdout leaves nothing to render to.
    let _ = out.write_all(text.as_bytes());
    let _ = out.flush();
}

/// Terminal text for one intent, including its trailing newline.
pub fn render(intent: &DisplayIntent) -> String {
    match intent {
        DisplayIntent::AppendMessage { author, segments } => render_message(*author, segments),
        DisplayIntent::ShowTyping => format!("{DIM}Gatechat is typing...{RESET}"),
        DisplayIntent::HideTyping => CLEAR_LINE.to_string(),
        DisplayIntent::ShowNotice { kind, text } => match kind {
            NoticeKind::Confirmation => format!("{BOLD}✓ {text}{RESET}\n"),
            NoticeKind::Toast => format!("{DIM}» {text}{RESET}\n"),
        },
        DisplayIntent::SetGate(GateState::Locked) => {
            format!("{DIM}Enter your access key to start chatting.{RESET}\n")
        }
        DisplayIntent::SetGate(GateState::Unlocked) => {
            format!("{DIM}Chat unlocked. Type /help for commands.{RESET}\n")
        }
        DisplayIntent::Status(status) => format!("{DIM}[{}]{RESET}\n", status_line(status)),
    }
}

/// Status bar text, e.g. `Online · 23h 59m left`.
pub fn status_line(status: &SessionStatus) -> String {
    match (status.gate, status.remaining) {
        (GateState::Unlocked, Some(left)) => format!("Online · {left} left"),
        (GateState::Unlocked, None) => "Online".to_string(),
        (GateState::Locked, _) => "Locked".to_string(),
    }
}

fn render_message(author: Author, segments: &[TextSegment]) -> String {
    let name = match author {
        Author::User => "you",
        Author::Model => "gatechat",
    };
    let mut out = format!("{BOLD}{name}>{RESET} ");
    for segment in segments {
        match segment {
            TextSegment::PlainText { content } => out.push_str(&render_inline(content)),
            TextSegment::CodeBlock { content, .. } => {
                let label = segment.display_label().unwrap_or_default();
                out.push_str(&format!("\n{DIM}┌─ {label}{RESET}\n"));
                for line in content.lines() {
                    out.push_str(&format!("{DIM}│{RESET} {line}\n"));
                }
                out.push_str(&format!("{DIM}└─{RESET}\n"));
            }
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render_inline(text: &str) -> String {
    parse_inline(text)
        .into_iter()
        .map(|span| match span {
            Inline::Text(t) => t,
            Inline::Strong(t) => format!("{BOLD}{t}{RESET}"),
            Inline::Emphasis(t) => format!("{ITALIC}{t}{RESET}"),
            Inline::LineBreak => "\n".to_string(),
            Inline::ParagraphBreak => "\n\n".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatechat_ai::RemainingTime;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn message_renders_inline_styles() {
        let out = render(&DisplayIntent::AppendMessage {
            author: Author::Model,
            segments: vec![TextSegment::plain("a **b** *c*")],
        });
        assert!(out.contains("gatechat>"));
        assert!(out.contains(&format!("a {BOLD}b{RESET} {ITALIC}c{RESET}")));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn code_block_gets_label_header() {
        let out = render(&DisplayIntent::AppendMessage {
            author: Author::Model,
            segments: vec![
                TextSegment::plain("Try:"),
                TextSegment::code(Some("rust"), "let x = 1;\nlet y = 2;"),
            ],
        });
        assert!(out.contains("┌─ RUST"));
        assert!(out.contains("│\x1b[0m let x = 1;\n"));
        assert!(out.contains("│\x1b[0m let y = 2;\n"));
    }

    #[test]
    fn unlabelled_code_uses_text() {
        let out = render(&DisplayIntent::AppendMessage {
            author: Author::Model,
            segments: vec![TextSegment::code(None, "x")],
        });
        assert!(out.contains("┌─ TEXT"));
    }

    const SHORT: Duration = Duration::from_millis(10);

    async fn rendered(intents: Vec<DisplayIntent>, linger: Duration) -> String {
        let (tx, rx) = unbounded_channel();
        for intent in intents {
            tx.send(intent).unwrap();
        }
        let mut out = Vec::new();
        let close = async move {
            tokio::time::sleep(linger).await;
            drop(tx);
        };
        tokio::join!(run_to(rx, &mut out, |_| SHORT), close);
        String::from_utf8(out).unwrap()
    }

    fn toast(text: &str) -> DisplayIntent {
        DisplayIntent::ShowNotice {
            kind: NoticeKind::Toast,
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn notice_is_dismissed_after_its_lifetime() {
        let out = rendered(vec![toast("saved")], SHORT * 10).await;
        assert!(out.starts_with(&render(&toast("saved"))));
        assert!(out.ends_with("\x1b[1A\x1b[J"));
    }

    #[tokio::test]
    async fn multi_line_notice_is_dismissed_whole() {
        let out = rendered(vec![toast("one\n  two")], SHORT * 10).await;
        assert!(out.ends_with("\x1b[2A\x1b[J"));
    }

    #[tokio::test]
    async fn notice_followed_by_output_stays() {
        let out = rendered(
            vec![toast("saved"), DisplayIntent::SetGate(GateState::Locked)],
            SHORT * 10,
        )
        .await;
        assert!(!out.contains("\x1b[J"));
    }

    #[test]
    fn status_line_variants() {
        let online = SessionStatus {
            gate: GateState::Unlocked,
            remaining: Some(RemainingTime {
                hours: 23,
                minutes: 59,
            }),
        };
        assert_eq!(status_line(&online), "Online · 23h 59m left");

        let locked = SessionStatus {
            gate: GateState::Locked,
            remaining: None,
        };
        assert_eq!(status_line(&locked), "Locked");
    }
}
