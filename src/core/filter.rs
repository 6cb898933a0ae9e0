//! Per-message filtering and body preparation.
//!
//! These are the stages a message passes through before redaction:
//!
//! | Stage | Function | Controlled by |
//! |-------|----------|---------------|
//! | System filter | [`should_drop`] | `remove_system_messages` |
//! | Media simplification | [`prepare_body`] | `simplify_media` |
//! | Markup stripping | [`strip_markup`] | always on |
//!
//! After redaction, [`collapse_whitespace`] normalizes the body and an empty
//! result drops the message.
//!
//! # Examples
//!
//! ```
//! use chatscrub::config::CleanOptions;
//! use chatscrub::core::filter::prepare_body;
//! use chatscrub::message::{Message, MessageKind};
//!
//! let options = CleanOptions::new();
//! let photo = Message::new("bob", "<img src=...>").with_kind(MessageKind::Image);
//! assert_eq!(prepare_body(&photo, &options), "[Image]");
//!
//! let noisy = Message::new("bob", "hi <msgsource><a/></msgsource>");
//! assert_eq!(prepare_body(&noisy, &options), "hi");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::Message;
use crate::config::CleanOptions;

static MSGSOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<msgsource>.*?</msgsource>").expect("markup pattern is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Returns `true` when `msg` should be removed before any other processing.
pub fn should_drop(msg: &Message, options: &CleanOptions) -> bool {
    options.remove_system_messages && msg.is_system()
}

/// Produces the pre-redaction body of `msg`.
///
/// Media messages become their bracketed tag when simplification is on;
/// `<msgsource>` blocks are removed and the result is trimmed.
pub fn prepare_body(msg: &Message, options: &CleanOptions) -> String {
    let raw = match msg.media_placeholder() {
        Some(tag) if options.simplify_media => tag,
        _ => msg.content.as_str(),
    };
    strip_markup(raw).trim().to_string()
}

/// Removes every `<msgsource>...</msgsource>` block, across lines.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MSGSOURCE_RE.replace_all(text, "")
}

/// Replaces each run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    WHITESPACE_RE.replace_all(text, " ")
}
