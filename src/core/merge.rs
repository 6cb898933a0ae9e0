//! Consecutive-message merging and line layout.
//!
//! [`MergeFormatter`] is a small state machine fed one prepared [`Entry`] at a
//! time. It is either [`Idle`](BlockState::Idle) or
//! [`Accumulating`](BlockState::Accumulating) a block: a header such as
//! `[10:00] A: ` plus the fragments that will be space-joined into one line.
//!
//! Transitions:
//! - a new calendar date flushes the open block, returns to `Idle` and emits
//!   a blank line and a `--- YYYY-MM-DD ---` separator (unless time is hidden);
//! - same sender and same clock minute while merging is on appends a fragment;
//! - anything else flushes and opens a new block;
//! - [`finish`](MergeFormatter::finish) flushes whatever is left.
//!
//! ```
//! use chatscrub::core::merge::{Entry, MergeFormatter};
//!
//! let mut fmt = MergeFormatter::new(true, true);
//! fmt.push(Entry::new("u1", "A", "2024-01-15", "10:00", "Hi"));
//! fmt.push(Entry::new("u1", "A", "2024-01-15", "10:00", "there"));
//! fmt.push(Entry::new("u2", "B", "2024-01-15", "10:00", "Hello"));
//!
//! assert_eq!(
//!     fmt.finish(),
//!     vec!["", "--- 2024-01-15 ---", "[10:00] A: Hi there", "[10:00] B: Hello"]
//! );
//! ```

use crate::config::CleanOptions;

/// One message ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Sender key used for merge decisions
    pub sender_key: String,
    /// Label printed in the header
    pub label: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub minute: String,
    /// Final, non-empty body
    pub content: String,
}

impl Entry {
    pub fn new(
        sender_key: impl Into<String>,
        label: impl Into<String>,
        date: impl Into<String>,
        minute: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_key: sender_key.into(),
            label: label.into(),
            date: date.into(),
            minute: minute.into(),
            content: content.into(),
        }
    }
}

/// State of the block currently being built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    /// No open block. Entered at start and after every date change.
    #[default]
    Idle,
    /// An open block that will become one output line.
    Accumulating {
        sender_key: String,
        minute: String,
        header: String,
        fragments: Vec<String>,
    },
}

/// Stateful line builder for one run.
#[derive(Debug, Clone)]
pub struct MergeFormatter {
    merge: bool,
    show_time: bool,
    last_date: Option<String>,
    state: BlockState,
    lines: Vec<String>,
    blocks: usize,
    date_sections: usize,
}

impl MergeFormatter {
    pub fn new(merge: bool, show_time: bool) -> Self {
        Self {
            merge,
            show_time,
            last_date: None,
            state: BlockState::Idle,
            lines: Vec::new(),
            blocks: 0,
            date_sections: 0,
        }
    }

    pub fn from_options(options: &CleanOptions) -> Self {
        Self::new(options.merge_consecutive, !options.remove_time)
    }

    /// Feeds the next entry in time order.
    pub fn push(&mut self, entry: Entry) {
        if self.last_date.as_deref() != Some(entry.date.as_str()) {
            self.flush();
            if self.show_time {
                self.lines.push(String::new());
                self.lines.push(format!("--- {} ---", entry.date));
            }
            self.date_sections += 1;
            self.last_date = Some(entry.date.clone());
        }

        let merges = self.merge
            && matches!(
                &self.state,
                BlockState::Accumulating { sender_key, minute, .. }
                    if *sender_key == entry.sender_key && *minute == entry.minute
            );

        if merges {
            if let BlockState::Accumulating { fragments, .. } = &mut self.state {
                fragments.push(entry.content);
            }
            return;
        }

        self.flush();
        let header = if self.show_time {
            format!("[{}] {}: ", entry.minute, entry.label)
        } else {
            format!("{}: ", entry.label)
        };
        self.state = BlockState::Accumulating {
            sender_key: entry.sender_key,
            minute: entry.minute,
            header,
            fragments: vec![entry.content],
        };
    }

    /// Emits the open block, if any, and returns to `Idle`.
    pub fn flush(&mut self) {
        if let BlockState::Accumulating {
            header, fragments, ..
        } = std::mem::take(&mut self.state)
        {
            if !fragments.is_empty() {
                self.lines.push(format!("{header}{}", fragments.join(" ")));
                self.blocks += 1;
            }
        }
    }

    /// Flushes and returns every emitted line.
    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.lines
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BlockState::Idle
    }

    /// Lines emitted so far, excluding the open block.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Message lines emitted so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Distinct dates seen so far, counted even when separators are hidden.
    pub fn date_sections(&self) -> usize {
        self.date_sections
    }
}
