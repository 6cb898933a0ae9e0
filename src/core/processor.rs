//! End-to-end cleaning pipeline.
//!
//! [`transform`] is a pure function from a [`Transcript`] and [`CleanOptions`]
//! to the cleaned text. All per-run state (identity table, redactor, merge
//! block) lives inside the call, so concurrent or repeated calls never see
//! each other's data.
//!
//! Stages, in order:
//!
//! 1. stable sort by `createTime`
//! 2. identity resolution over the full sorted list
//! 3. header: banner, legend or anonymization notice, masking notice
//! 4. per message: system filter, media simplification, markup stripping,
//!    redaction, whitespace collapse, empty-body drop
//! 5. merge/format state machine, final flush
//!
//! ```
//! use chatscrub::config::{CleanOptions, Timezone};
//! use chatscrub::core::transform;
//! use chatscrub::{Message, Session, Transcript};
//!
//! let transcript = Transcript::new(
//!     Session::owned_by("me"),
//!     vec![
//!         Message::new("me", "Morning!").with_create_time(1705312800),
//!         Message::new("me", "Coffee?").with_create_time(1705312830),
//!     ],
//! );
//! let options = CleanOptions::new().with_timezone(Timezone::utc());
//!
//! let text = transform(&transcript, &options);
//! assert!(text.ends_with("[10:00] A: Morning! Coffee?"));
//! ```

use serde::Serialize;

use crate::Message;
use crate::config::CleanOptions;
use crate::core::filter::{collapse_whitespace, prepare_body, should_drop};
use crate::core::identity::{IdentityTable, LabelStyle};
use crate::core::merge::{Entry, MergeFormatter};
use crate::core::redact::Redactor;
use crate::error::Result;
use crate::transcript::Transcript;

pub const SESSION_BANNER: &str = "--- Chat Session ---";
pub const LEGEND_START: &str = "[Legend]";
pub const LEGEND_END: &str = "[End Legend]";
pub const ANONYMIZED_NOTICE: &str = "Note: Users have been anonymized.";
pub const MASKED_NOTICE: &str = "Note: Sensitive data (phones, emails, urls, names) redacted.";

/// Counters describing one cleaning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    /// Messages in the input
    pub total_messages: usize,
    /// Removed by the system-message filter
    pub system_dropped: usize,
    /// Removed because nothing was left after cleaning
    pub empty_dropped: usize,
    /// Messages that reached the formatter
    pub emitted_messages: usize,
    /// Message lines in the output (after merging)
    pub output_lines: usize,
    /// Distinct senders in the whole transcript
    pub participants: usize,
    /// Distinct calendar dates among emitted messages
    pub date_sections: usize,
}

impl CleanStats {
    /// Messages folded into an earlier line.
    pub fn merged_count(&self) -> usize {
        self.emitted_messages.saturating_sub(self.output_lines)
    }

    /// Percentage of input messages that no longer occupy their own line.
    pub fn compression_ratio(&self) -> f64 {
        if self.total_messages == 0 {
            return 0.0;
        }
        (1.0 - (self.output_lines as f64 / self.total_messages as f64)) * 100.0
    }
}

/// Cleans a transcript into LLM-friendly text.
pub fn transform(transcript: &Transcript, options: &CleanOptions) -> String {
    transform_with_stats(transcript, options).0
}

/// Parses a JSON export and cleans it.
///
/// Fails only when the JSON is malformed or lacks a `messages` array.
pub fn transform_json(json: &str, options: &CleanOptions) -> Result<String> {
    let transcript = Transcript::from_json_str(json)?;
    Ok(transform(&transcript, options))
}

/// Like [`transform`], also returning run counters.
pub fn transform_with_stats(transcript: &Transcript, options: &CleanOptions) -> (String, CleanStats) {
    let mut sorted: Vec<&Message> = transcript.messages.iter().collect();
    sorted.sort_by_key(|m| m.create_time);

    let identities = IdentityTable::resolve(sorted.iter().copied(), &transcript.session);
    let mut lines = header_lines(&identities, options);

    let redactor = options
        .mask_sensitive
        .then(|| Redactor::from_options(options, &identities));
    let style = LabelStyle::from_options(options);
    let mut formatter = MergeFormatter::from_options(options);

    let mut stats = CleanStats {
        total_messages: sorted.len(),
        participants: identities.len(),
        ..CleanStats::default()
    };

    for msg in sorted {
        if should_drop(msg, options) {
            stats.system_dropped += 1;
            continue;
        }

        let mut body = prepare_body(msg, options);
        if let Some(redactor) = &redactor {
            body = redactor.redact(&body);
        }
        let body = collapse_whitespace(&body).into_owned();
        if body.is_empty() {
            stats.empty_dropped += 1;
            continue;
        }

        let (date, minute) = options.timezone.date_and_minute(msg.create_time);
        let key = msg.sender_key();
        formatter.push(Entry {
            sender_key: key.to_string(),
            label: identities.label(key, style),
            date,
            minute,
            content: body,
        });
        stats.emitted_messages += 1;
    }

    formatter.flush();
    stats.date_sections = formatter.date_sections();
    stats.output_lines = formatter.blocks();
    lines.extend(formatter.finish());

    tracing::debug!(
        total = stats.total_messages,
        system_dropped = stats.system_dropped,
        empty_dropped = stats.empty_dropped,
        output_lines = stats.output_lines,
        "cleaned transcript"
    );

    (lines.join("\n"), stats)
}

/// Builds the banner, legend and notice lines that open every output.
pub fn header_lines(identities: &IdentityTable, options: &CleanOptions) -> Vec<String> {
    let mut lines = vec![SESSION_BANNER.to_string()];

    if options.use_short_aliases {
        lines.push(LEGEND_START.to_string());
        for participant in identities.iter() {
            if options.anonymize_users {
                lines.push(format!("{}: Person {}", participant.alias, participant.alias));
            } else {
                lines.push(format!("{}: {}", participant.alias, participant.display_name));
            }
        }
        lines.push(LEGEND_END.to_string());
    } else if options.anonymize_users {
        lines.push(ANONYMIZED_NOTICE.to_string());
    }

    if options.mask_sensitive {
        lines.push(MASKED_NOTICE.to_string());
    }
    lines.push(String::new());
    lines
}
