//! Splits model replies into prose and fenced code blocks.
//!
//! A fence is three backticks, optionally followed directly by a language
//! tag (`[A-Za-z0-9_]+`), then the code, then a closing three backticks.
//! Whitespace between the tag and the code is dropped and the code is
//! trimmed. An opening fence without a closing one stays literal text.

mod inline;

pub use inline::{parse_inline, Inline};

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([a-zA-Z0-9_]+)?\s*(.*?)```").unwrap());

/// Label used for code blocks that carry no language tag.
pub const DEFAULT_CODE_LABEL: &str = "text";

/// One displayable piece of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    PlainText {
        content: String,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
}

impl TextSegment {
    pub fn plain(content: impl Into<String>) -> Self {
        TextSegment::PlainText {
            content: content.into(),
        }
    }

    pub fn code(language: Option<&str>, content: impl Into<String>) -> Self {
        TextSegment::CodeBlock {
            language: language.map(String::from),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TextSegment::PlainText { content } | TextSegment::CodeBlock { content, .. } => content,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, TextSegment::CodeBlock { .. })
    }

    /// The code block's language, or `text` when untagged. `None` for prose.
    pub fn label(&self) -> Option<&str> {
        match self {
            TextSegment::CodeBlock { language, .. } => {
                Some(language.as_deref().unwrap_or(DEFAULT_CODE_LABEL))
            }
            TextSegment::PlainText { .. } => None,
        }
    }

    /// Upper-cased [`label`](Self::label) for code block headers.
    pub fn display_label(&self) -> Option<String> {
        self.label().map(str::to_uppercase)
    }
}

/// Split `text` into ordered plain and code segments.
///
/// Only non-empty gaps around fences become plain segments. Input without
/// any complete fence comes back as a single plain segment, even when empty.
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            segments.push(TextSegment::plain(&text[last..whole.start()]));
        }
        let language = caps.get(1).map(|m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str()).trim();
        segments.push(TextSegment::code(language, code));
        last = whole.end();
    }

    if last < text.len() {
        segments.push(TextSegment::plain(&text[last..]));
    }

    if segments.is_empty() {
        segments.push(TextSegment::plain(text));
    }
    segments
}
