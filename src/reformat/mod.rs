//! Clipboard text reformatting for pasted model answers

pub mod clipboard;

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_WIDTH: usize = 80;

/// Text before this marker is chatter the model emitted ahead of the answer.
pub const TITLE_MARKER: &str = "**Project Title:**";

static PREAMBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A.*?\*\*Project Title:\*\*").expect("valid regex"));
static MISSING_SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*.*?\*\*|###").expect("valid regex"));

/// Reflow raw model output into headings and `width`-column paragraphs.
pub fn format_text(text: &str, width: usize) -> String {
    let text = PREAMBLE.replace(text, TITLE_MARKER);
    let text = MISSING_SENTENCE_BREAK.replace_all(&text, "$1. $2");
    let text = WHITESPACE.replace_all(&text, " ");

    let mut formatted = String::new();
    for segment in split_keeping_headings(text.trim()) {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_heading(segment) {
            formatted.push_str("\n\n");
            formatted.push_str(trimmed);
            formatted.push_str("\n\n");
        } else {
            formatted.push_str(&textwrap::fill(trimmed, width));
            formatted.push_str("\n\n");
        }
    }

    formatted.trim().to_string()
}

fn is_heading(segment: &str) -> bool {
    segment.starts_with("**") || segment.starts_with("###")
}

/// Splits around heading tokens, keeping the tokens as their own segments.
fn split_keeping_headings(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut last = 0;
    for token in HEADING.find_iter(text) {
        segments.push(&text[last..token.start()]);
        segments.push(token.as_str());
        last = token.end();
    }
    segments.push(&text[last..]);
    segments
}
