//! Inline emphasis and line structure inside plain-text segments.

use std::sync::LazyLock;

use regex::Regex;

static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*|\*(.*?)\*|\n\n|\n").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// `**strong**`
    Strong(String),
    /// `*emphasis*`
    Emphasis(String),
    LineBreak,
    ParagraphBreak,
}

/// Split prose into inline spans. Markers never span a line break.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Inline::Text(text[last..whole.start()].to_string()));
        }
        let span = if let Some(strong) = caps.get(1) {
            Inline::Strong(strong.as_str().to_string())
        } else if let Some(em) = caps.get(2) {
            Inline::Emphasis(em.as_str().to_string())
        } else if whole.as_str() == "\n\n" {
            Inline::ParagraphBreak
        } else {
            Inline::LineBreak
        };
        spans.push(span);
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Inline::Text(text[last..].to_string()));
    }
    spans
}
