//! Transcript container and loading.
//!
//! A [`Transcript`] is the whole export: [`Session`] metadata plus the list of
//! raw [`Message`] records. Loading is deliberately two-step. The JSON is first
//! decoded into a [`serde_json::Value`] so that a missing or non-array
//! `messages` field can be reported as [`ChatscrubError::InvalidFormat`]
//! rather than as a generic decoding failure.
//!
//! ```
//! use chatscrub::Transcript;
//!
//! let transcript = Transcript::from_json_str(r#"{
//!     "session": {"wxid": "wxid_me", "displayName": "Family"},
//!     "messages": [{"createTime": 1705314600, "content": "hi", "senderUsername": "wxid_me"}]
//! }"#)?;
//! assert_eq!(transcript.messages.len(), 1);
//! assert_eq!(transcript.session.owner_id(), Some("wxid_me"));
//!
//! let err = Transcript::from_json_str(r#"{"messages": {}}"#).unwrap_err();
//! assert!(err.is_format_error());
//! # Ok::<(), chatscrub::ChatscrubError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Message;
use crate::error::{ChatscrubError, Result};

/// Metadata describing whose export this is.
///
/// Every field is optional; an export without a session block behaves like
/// one whose owner is unknown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// Identifier of the export owner. Matches `senderUsername` on their messages.
    pub wxid: Option<String>,
    pub nickname: Option<String>,
    pub remark: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub last_timestamp: Option<i64>,
    pub message_count: Option<u64>,
}

impl Session {
    /// Creates a session owned by `wxid`.
    pub fn owned_by(wxid: impl Into<String>) -> Self {
        Self {
            wxid: Some(wxid.into()),
            ..Self::default()
        }
    }

    /// The owner's sender identifier, if known and non-empty.
    pub fn owner_id(&self) -> Option<&str> {
        self.wxid.as_deref().filter(|s| !s.is_empty())
    }
}

/// A complete chat export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub session: Session,
    pub messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript from parts.
    pub fn new(session: Session, messages: Vec<Message>) -> Self {
        Self { session, messages }
    }

    /// Parses an export from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Parses an export from any reader yielding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Reads and parses an export file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ChatscrubError::read(path, e))?;
        let transcript = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            messages = transcript.messages.len(),
            "loaded transcript"
        );
        Ok(transcript)
    }

    /// Converts an already-decoded JSON value.
    ///
    /// Fails with [`ChatscrubError::missing_messages`] when `messages` is
    /// absent or not an array.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.get("messages").is_some_and(Value::is_array) {
            return Err(ChatscrubError::missing_messages());
        }
        Ok(serde_json::from_value(value)?)
    }
}
