//! Core cleaning logic for chatscrub.
//!
//! This module contains:
//! - [`identity`] - Sender keys, display names and single-letter aliases
//! - [`filter`] - System-message filter and body preparation
//! - [`redact`] - Ordered PII rewrite passes
//! - [`merge`] - Consecutive-message merging and line layout
//! - [`processor`] - The [`transform`] pipeline and [`CleanStats`]
//!
//! # Quick Start
//!
//! ```rust
//! use chatscrub::core::{CleanStats, transform_with_stats};
//! use chatscrub::{CleanOptions, Transcript};
//!
//! let transcript = Transcript::from_json_str(r#"{"messages": []}"#).unwrap();
//! let (text, stats) = transform_with_stats(&transcript, &CleanOptions::new());
//!
//! assert!(text.starts_with("--- Chat Session ---"));
//! assert_eq!(stats, CleanStats::default());
//! ```

pub mod filter;
pub mod identity;
pub mod merge;
pub mod processor;
pub mod redact;

// Re-export main types for convenience
pub use identity::{IdentityTable, LabelStyle, Participant};
pub use merge::{Entry, MergeFormatter};
pub use processor::{CleanStats, header_lines, transform, transform_json, transform_with_stats};
pub use redact::{RewritePass, Redactor};
