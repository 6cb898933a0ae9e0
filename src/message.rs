//! Raw message records from a chat export.
//!
//! This module provides [`Message`], one entry of an exported transcript as
//! the exporter wrote it, together with [`MessageKind`], a typed view of the
//! numeric `localType` classifier that drives media simplification and
//! system-message filtering.
//!
//! # Examples
//!
//! ```
//! use chatscrub::message::{Message, MessageKind};
//!
//! let msg = Message::new("wxid_alice", "Hello!")
//!     .with_display_name("Alice")
//!     .with_create_time(1705314600);
//!
//! assert_eq!(msg.sender_key(), "wxid_alice");
//! assert_eq!(msg.kind(), MessageKind::Text);
//! ```
//!
//! Records deserialize from the exporter's camelCase JSON:
//!
//! ```
//! use chatscrub::Message;
//!
//! let msg: Message = serde_json::from_str(
//!     r#"{"createTime": 1705314600, "localType": 3, "content": "<img/>", "senderUsername": "bob"}"#,
//! )?;
//! assert_eq!(msg.media_placeholder(), Some("[Image]"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Sender key used when a record names no sender at all.
pub const UNKNOWN_SENDER: &str = "unknown_user";

/// Literal `type` string some exporters use for "pat" notifications.
pub const PAT_MESSAGE_TYPE: &str = "拍一拍消息";

/// A single transcript entry, exactly as exported.
///
/// Every field is optional in the JSON. A missing or `null` body is read as
/// the empty string; a `null` time or type reads as 0 and fractional values
/// are truncated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Exporter-local row id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<i64>,

    /// Creation time in seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub create_time: i64,

    /// Pre-rendered time string from the exporter. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_time: Option<String>,

    /// Free-form type tag. Sometimes a description, sometimes a number.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,

    /// Numeric type classifier, see [`MessageKind`].
    #[serde(default, deserialize_with = "lenient_i64")]
    pub local_type: i64,

    /// Message body. May carry embedded `<msgsource>` markup.
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,

    /// 1 when sent by the export owner, 0 when received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_send: Option<i64>,

    /// Stable sender identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_username: Option<String>,

    /// Human-readable sender name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_avatar_key: Option<String>,

    /// Raw XML source, usually noise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_md5: Option<String>,
}

/// The `type` field of a record, which exporters fill inconsistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    /// Numeric type id
    Code(i64),
    /// Human-readable description such as `"文本消息"`
    Label(String),
}

/// Typed view of the numeric `localType` classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Video,
    Sticker,
    /// Shared link, file or mini-program card
    Link,
    /// Join/leave/recall notices and similar
    System,
    /// Anything not listed above; passed through untouched
    Other(i64),
}

impl MessageKind {
    /// Maps a raw `localType` value to a kind.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => MessageKind::Text,
            3 => MessageKind::Image,
            34 => MessageKind::Audio,
            43 => MessageKind::Video,
            47 => MessageKind::Sticker,
            49 => MessageKind::Link,
            10000 => MessageKind::System,
            other => MessageKind::Other(other),
        }
    }

    /// Returns the raw `localType` value for this kind.
    pub fn code(self) -> i64 {
        match self {
            MessageKind::Text => 1,
            MessageKind::Image => 3,
            MessageKind::Audio => 34,
            MessageKind::Video => 43,
            MessageKind::Sticker => 47,
            MessageKind::Link => 49,
            MessageKind::System => 10000,
            MessageKind::Other(code) => code,
        }
    }

    /// Bracketed tag that replaces the body of media messages.
    ///
    /// Returns `None` for kinds whose body is kept.
    pub fn media_tag(self) -> Option<&'static str> {
        match self {
            MessageKind::Image => Some("[Image]"),
            MessageKind::Audio => Some("[Audio]"),
            MessageKind::Video => Some("[Video]"),
            MessageKind::Sticker => Some("[Sticker]"),
            MessageKind::Link => Some("[Link/File]"),
            _ => None,
        }
    }
}

impl Message {
    /// Creates a text message from `sender_username` with the given body.
    ///
    /// An empty `sender` leaves the username unset.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        let sender = sender.into();
        Self {
            sender_username: (!sender.is_empty()).then_some(sender),
            content: content.into(),
            local_type: MessageKind::Text.code(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the creation timestamp (seconds).
    #[must_use]
    pub fn with_create_time(mut self, seconds: i64) -> Self {
        self.create_time = seconds;
        self
    }

    /// Builder method to set the sender display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.sender_display_name = Some(name.into());
        self
    }

    /// Builder method to set the numeric type classifier.
    #[must_use]
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.local_type = kind.code();
        self
    }

    /// Builder method to set the free-form `type` string.
    #[must_use]
    pub fn with_type_label(mut self, label: impl Into<String>) -> Self {
        self.type_tag = Some(TypeTag::Label(label.into()));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Identifier used to group messages by sender.
    ///
    /// Falls back from username to display name to [`UNKNOWN_SENDER`].
    /// Empty strings count as absent.
    pub fn sender_key(&self) -> &str {
        non_empty(self.sender_username.as_deref())
            .or_else(|| non_empty(self.sender_display_name.as_deref()))
            .unwrap_or(UNKNOWN_SENDER)
    }

    /// The explicit display name, if the record carries a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.sender_display_name.as_deref())
    }

    /// Typed view of `localType`.
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_code(self.local_type)
    }

    /// Returns `true` for system notices.
    ///
    /// Matches either the numeric system classifier or the literal
    /// [`PAT_MESSAGE_TYPE`] type string.
    pub fn is_system(&self) -> bool {
        self.kind() == MessageKind::System
            || matches!(&self.type_tag, Some(TypeTag::Label(label)) if label == PAT_MESSAGE_TYPE)
    }

    /// Placeholder that replaces this message's body when media is simplified.
    pub fn media_placeholder(&self) -> Option<&'static str> {
        self.kind().media_tag()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer or float as written by the exporter.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonNumber {
    Int(i64),
    Float(f64),
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonNumber>::deserialize(deserializer)? {
        Some(JsonNumber::Int(n)) => n,
        Some(JsonNumber::Float(f)) => f.trunc() as i64,
        None => 0,
    })
}
