//! Sender identity resolution and aliasing.
//!
//! [`IdentityTable::resolve`] walks the time-sorted messages once and records
//! every distinct sender in order of first appearance, giving each a display
//! name and a single-letter alias (`A`, `B`, `C`, ...). The table covers the
//! whole transcript, so later filtering can never shift an alias.
//!
//! ```
//! use chatscrub::core::identity::IdentityTable;
//! use chatscrub::{Message, Session};
//!
//! let messages = vec![
//!     Message::new("wxid_me", "hi"),
//!     Message::new("wxid_bob", "yo").with_display_name("Bob"),
//! ];
//! let table = IdentityTable::resolve(&messages, &Session::owned_by("wxid_me"));
//!
//! assert_eq!(table.alias("wxid_me"), Some("A"));
//! assert_eq!(table.display_name("wxid_me"), Some("Me"));
//! assert_eq!(table.alias("wxid_bob"), Some("B"));
//! ```

use std::collections::HashMap;

use crate::Message;
use crate::config::CleanOptions;
use crate::transcript::Session;

/// Display name given to the export owner when their record carries none.
pub const OWNER_DISPLAY_NAME: &str = "Me";

/// One resolved sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Sender key (username, else display name, else `unknown_user`)
    pub key: String,
    /// Name shown when users are not anonymized
    pub display_name: String,
    /// Sequential single-letter alias
    pub alias: String,
}

/// Every sender of a transcript, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl IdentityTable {
    /// Builds the table from messages already sorted by time.
    pub fn resolve<'a, I>(messages: I, session: &Session) -> Self
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let owner = session.owner_id();
        let mut table = Self::default();

        for msg in messages {
            let key = msg.sender_key();
            if table.index.contains_key(key) {
                continue;
            }

            let display_name = match msg.display_name() {
                Some(name) => name.to_string(),
                None if owner == Some(key) => OWNER_DISPLAY_NAME.to_string(),
                None => key.to_string(),
            };

            let alias = alias_for(table.participants.len());
            table.index.insert(key.to_string(), table.participants.len());
            table.participants.push(Participant {
                key: key.to_string(),
                display_name,
                alias,
            });
        }

        tracing::debug!(participants = table.len(), "resolved sender identities");
        table
    }

    pub fn get(&self, key: &str) -> Option<&Participant> {
        self.index.get(key).map(|&i| &self.participants[i])
    }

    pub fn alias(&self, key: &str) -> Option<&str> {
        self.get(key).map(|p| p.alias.as_str())
    }

    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.get(key).map(|p| p.display_name.as_str())
    }

    /// Participants in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Resolves the label printed before a sender's messages.
    pub fn label(&self, key: &str, style: LabelStyle) -> String {
        match style {
            LabelStyle::Alias => self.alias(key).unwrap_or("?").to_string(),
            LabelStyle::Anonymous => format!("User {}", self.alias(key).unwrap_or("?")),
            LabelStyle::DisplayName => self.display_name(key).unwrap_or("Unknown").to_string(),
        }
    }
}

/// How senders are labelled in output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `A`
    Alias,
    /// `User A`
    Anonymous,
    /// The resolved display name
    DisplayName,
}

impl LabelStyle {
    /// Short aliases win over anonymization, which wins over real names.
    pub fn from_options(options: &CleanOptions) -> Self {
        if options.use_short_aliases {
            LabelStyle::Alias
        } else if options.anonymize_users {
            LabelStyle::Anonymous
        } else {
            LabelStyle::DisplayName
        }
    }
}

/// Alias for the `index`-th distinct sender: `A`, `B`, ... and onward
/// through the following code points.
pub fn alias_for(index: usize) -> String {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(u32::from(b'A')))
        .and_then(char::from_u32)
        .unwrap_or('?')
        .to_string()
}
