//! Cleaning configuration.
//!
//! [`CleanOptions`] is the single configuration record for a run. Its toggles
//! compose independently; see the field docs for the one interaction
//! (participant-name masking requires both `mask_sensitive` and
//! `anonymize_users`).
//!
//! # Example
//!
//! ```rust
//! use chatscrub::config::{CleanOptions, Timezone};
//!
//! let options = CleanOptions::new()
//!     .with_anonymize_users(true)
//!     .with_custom_keywords("Acme Corp, Springfield")
//!     .with_timezone(Timezone::utc());
//!
//! assert!(options.use_short_aliases);
//! assert_eq!(options.keywords(), vec!["Acme Corp", "Springfield"]);
//! ```
//!
//! Options also load from the camelCase JSON the original tool stores:
//!
//! ```rust
//! use chatscrub::config::CleanOptions;
//!
//! let options: CleanOptions = serde_json::from_str(r#"{"removeTime": true, "timezone": "+08:00"}"#)?;
//! assert!(options.remove_time);
//! assert!(options.merge_consecutive); // unspecified fields keep their defaults
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatscrubError;

/// Toggles controlling how a transcript is cleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanOptions {
    /// Replace sender names with `User X` / `Person X` labels (default: false).
    ///
    /// Combined with `mask_sensitive`, known participant names are also
    /// masked inside message bodies.
    pub anonymize_users: bool,

    /// Drop date separators and `[HH:MM]` prefixes (default: false)
    pub remove_time: bool,

    /// Drop system notices (default: true)
    pub remove_system_messages: bool,

    /// Replace media bodies with bracketed tags (default: true)
    pub simplify_media: bool,

    /// Join same-sender, same-minute messages into one line (default: true)
    pub merge_consecutive: bool,

    /// Run the redaction passes over message bodies (default: true)
    pub mask_sensitive: bool,

    /// Label senders by single-letter alias and print a legend (default: true)
    pub use_short_aliases: bool,

    /// Extra terms to redact, separated by commas or newlines.
    pub custom_keywords: String,

    /// Zone used to render dates and clock minutes (default: host local time).
    pub timezone: Timezone,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            anonymize_users: false,
            remove_time: false,
            remove_system_messages: true,
            simplify_media: true,
            merge_consecutive: true,
            mask_sensitive: true,
            use_short_aliases: true,
            custom_keywords: String::new(),
            timezone: Timezone::Local,
        }
    }
}

impl CleanOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with every toggle off: full names, timestamps, no merging and
    /// no redaction.
    pub fn raw() -> Self {
        Self {
            anonymize_users: false,
            remove_time: false,
            remove_system_messages: false,
            simplify_media: false,
            merge_consecutive: false,
            mask_sensitive: false,
            use_short_aliases: false,
            custom_keywords: String::new(),
            timezone: Timezone::Local,
        }
    }

    #[must_use]
    pub fn with_anonymize_users(mut self, enabled: bool) -> Self {
        self.anonymize_users = enabled;
        self
    }

    #[must_use]
    pub fn with_remove_time(mut self, enabled: bool) -> Self {
        self.remove_time = enabled;
        self
    }

    #[must_use]
    pub fn with_remove_system_messages(mut self, enabled: bool) -> Self {
        self.remove_system_messages = enabled;
        self
    }

    #[must_use]
    pub fn with_simplify_media(mut self, enabled: bool) -> Self {
        self.simplify_media = enabled;
        self
    }

    #[must_use]
    pub fn with_merge_consecutive(mut self, enabled: bool) -> Self {
        self.merge_consecutive = enabled;
        self
    }

    #[must_use]
    pub fn with_mask_sensitive(mut self, enabled: bool) -> Self {
        self.mask_sensitive = enabled;
        self
    }

    #[must_use]
    pub fn with_short_aliases(mut self, enabled: bool) -> Self {
        self.use_short_aliases = enabled;
        self
    }

    /// Sets the raw custom keyword list.
    #[must_use]
    pub fn with_custom_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.custom_keywords = keywords.into();
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Splits `custom_keywords` into trimmed, non-empty terms.
    ///
    /// Accepts ASCII commas, full-width commas (`，`) and newlines as
    /// separators. Order is preserved; sorting happens in the redactor.
    pub fn keywords(&self) -> Vec<&str> {
        self.custom_keywords
            .split([',', '，', '\n'])
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Zone in which timestamps are rendered.
///
/// Date separators and merge decisions depend on the rendered wall-clock
/// values, so the same export can group differently under different zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timezone {
    /// The host's local zone
    #[default]
    Local,
    /// A fixed UTC offset
    Fixed(FixedOffset),
}

impl Timezone {
    /// UTC (`+00:00`).
    pub fn utc() -> Self {
        Timezone::Fixed(Utc.fix())
    }

    /// A fixed offset in seconds east of UTC, if within ±24h.
    pub fn from_offset_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Timezone::Fixed)
    }

    /// Renders `seconds` since the epoch as `(YYYY-MM-DD, HH:MM)`.
    ///
    /// Out-of-range timestamps render as the epoch.
    pub fn date_and_minute(&self, seconds: i64) -> (String, String) {
        let utc: DateTime<Utc> = DateTime::from_timestamp(seconds, 0).unwrap_or_default();
        match self {
            Timezone::Local => {
                let dt = utc.with_timezone(&Local);
                (
                    dt.format("%Y-%m-%d").to_string(),
                    dt.format("%H:%M").to_string(),
                )
            }
            Timezone::Fixed(offset) => {
                let dt = utc.with_timezone(offset);
                (
                    dt.format("%Y-%m-%d").to_string(),
                    dt.format("%H:%M").to_string(),
                )
            }
        }
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => write!(f, "local"),
            Timezone::Fixed(offset) if offset.local_minus_utc() == 0 => write!(f, "utc"),
            Timezone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for Timezone {
    type Err = ChatscrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => return Ok(Timezone::Local),
            "utc" | "gmt" | "z" => return Ok(Timezone::utc()),
            _ => {}
        }

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(ChatscrubError::invalid_timezone(s)),
        };

        if !rest.is_ascii() {
            return Err(ChatscrubError::invalid_timezone(s));
        }

        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => rest.split_at(2),
            None => (rest, "0"),
        };

        let hours: i32 = hours
            .parse()
            .map_err(|_| ChatscrubError::invalid_timezone(s))?;
        let minutes: i32 = minutes
            .parse()
            .map_err(|_| ChatscrubError::invalid_timezone(s))?;
        if !(0..60).contains(&minutes) {
            return Err(ChatscrubError::invalid_timezone(s));
        }

        Timezone::from_offset_seconds(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| ChatscrubError::invalid_timezone(s))
    }
}

impl TryFrom<String> for Timezone {
    type Error = ChatscrubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.to_string()
    }
}
