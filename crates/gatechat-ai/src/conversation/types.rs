//! Gate state, display intents, and the busy guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::access::RemainingTime;
use crate::segment::TextSegment;

/// Whether chat is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

/// Who a rendered message is styled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Gate confirmations.
    Confirmation,
    /// Short feedback such as copy results or rejected attachments.
    Toast,
}

impl NoticeKind {
    /// How long the notice stays on screen.
    pub fn lifetime(self) -> Duration {
        match self {
            NoticeKind::Confirmation => Duration::from_secs(3),
            NoticeKind::Toast => Duration::from_secs(2),
        }
    }
}

/// What the status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub gate: GateState,
    pub remaining: Option<RemainingTime>,
}

/// A rendering instruction, in the order it should be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIntent {
    AppendMessage {
        author: Author,
        segments: Vec<TextSegment>,
    },
    ShowTyping,
    HideTyping,
    ShowNotice {
        kind: NoticeKind,
        text: String,
    },
    SetGate(GateState),
    Status(SessionStatus),
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input with nothing attached.
    Ignored,
    /// Another submit is still in flight.
    Busy,
    /// Wrong secret while locked.
    Rejected,
    /// Correct secret; the gate is now open.
    Unlocked,
    /// The model answered with this text.
    Replied(String),
    /// The send failed and the generic failure message was shown.
    Failed,
}

/// Clears the busy flag on drop, including when the future is cancelled.
pub(crate) struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Returns `None` if the flag is already set.
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
