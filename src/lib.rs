//! # Chatscrub
//!
//! A Rust library for turning WeChat-style chat exports into compact,
//! privacy-scrubbed plain text that fits well in a Large Language Model
//! context window.
//!
//! ## Overview
//!
//! Chatscrub takes one exported transcript (a session record plus a list of
//! raw messages) and produces a single text document:
//! - senders replaced by stable single-letter aliases with a legend
//! - system notices dropped, media bodies replaced by `[Image]`-style tags
//! - URLs, e-mails, long numbers, phone numbers, addresses and likely Chinese
//!   personal names masked
//! - same-sender, same-minute messages merged onto one line
//!
//! ## Quick Start
//!
//! ```rust
//! use chatscrub::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = r#"{
//!         "session": {"wxid": "wxid_me"},
//!         "messages": [
//!             {"createTime": 1705312800, "localType": 1, "content": "Call 13812345678", "senderUsername": "wxid_me"},
//!             {"createTime": 1705312810, "localType": 3, "content": "<img/>", "senderUsername": "wxid_bob", "senderDisplayName": "Bob"}
//!         ]
//!     }"#;
//!
//!     let transcript = Transcript::from_json_str(json)?;
//!     let options = CleanOptions::new().with_timezone(Timezone::utc());
//!     let text = transform(&transcript, &options);
//!
//!     assert!(text.contains("A: Me"));
//!     assert!(text.contains("[10:00] A: Call [NUM_REDACTED]"));
//!     assert!(text.contains("[10:00] B: [Image]"));
//!     Ok(())
//! }
//! ```
//!
//! ## Loading From Disk
//!
//! ```rust,no_run
//! use chatscrub::{CleanOptions, Transcript, transform};
//!
//! let transcript = Transcript::load("export.json")?;
//! println!("{}", transform(&transcript, &CleanOptions::new()));
//! # Ok::<(), chatscrub::ChatscrubError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] - Raw [`Message`] records and [`MessageKind`](message::MessageKind)
//! - [`transcript`] - [`Transcript`] and [`Session`], JSON loading
//! - [`config`] - [`CleanOptions`] and [`Timezone`](config::Timezone)
//! - [`core`] - The cleaning pipeline
//!   - [`core::identity`] - Sender keys and aliases
//!   - [`core::filter`] - System filter, media tags, markup stripping
//!   - [`core::redact`] - Ordered PII rewrite passes
//!   - [`core::merge`] - Merge/format state machine
//!   - [`core::processor`] - [`transform`], [`CleanStats`](core::CleanStats)
//! - [`error`] - Unified error types ([`ChatscrubError`], [`Result`])
//! - `cli` - CLI arguments (feature `cli`)
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod transcript;

// Re-export the main types at the crate root for convenience
pub use config::CleanOptions;
pub use core::{transform, transform_json, transform_with_stats};
pub use error::{ChatscrubError, Result};
pub use message::Message;
pub use transcript::{Session, Transcript};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatscrub::prelude::*;
/// ```
pub mod prelude {
    // Input model
    pub use crate::message::{Message, MessageKind};
    pub use crate::transcript::{Session, Transcript};

    // Error types
    pub use crate::error::{ChatscrubError, Result};

    // Configuration
    pub use crate::config::{CleanOptions, Timezone};

    // Pipeline
    pub use crate::core::{CleanStats, Redactor, transform, transform_json, transform_with_stats};
}
