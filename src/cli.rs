//! Command-line interface definition using clap.
//!
//! [`Args`] holds the parsed command line. Flags only ever move an option
//! away from its default, so they layer cleanly over a `--config` file:
//!
//! ```rust
//! use chatscrub::CleanOptions;
//! use chatscrub::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatscrub", "chat.json", "--anonymize", "--keywords", "Acme"]);
//! let options = args.apply_to(CleanOptions::new());
//!
//! assert!(options.anonymize_users);
//! assert_eq!(options.keywords(), vec!["Acme"]);
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CleanOptions, Timezone};

/// Output path meaning "write to stdout".
pub const STDOUT_PATH: &str = "-";

/// Clean WeChat-style chat exports into privacy-scrubbed,
/// token-efficient text for LLMs.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatscrub")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatscrub export.json
    chatscrub export.json -o cleaned.txt --stats
    chatscrub export.json --anonymize --keywords \"Acme Corp,Springfield\"
    chatscrub export.json --no-mask --full-names --timezone +08:00
    chatscrub export.json --config options.json --remove-time")]
pub struct Args {
    /// Path to the exported JSON transcript
    pub input: PathBuf,

    /// Path to output file ("-" for stdout)
    #[arg(short, long, default_value = STDOUT_PATH)]
    pub output: String,

    /// Load options from a JSON file (camelCase keys); flags override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Replace sender names with anonymous labels
    #[arg(short, long)]
    pub anonymize: bool,

    /// Drop date separators and [HH:MM] prefixes
    #[arg(long)]
    pub remove_time: bool,

    /// Keep system notices
    #[arg(long)]
    pub keep_system: bool,

    /// Keep raw media bodies instead of [Image]-style tags
    #[arg(long)]
    pub keep_media: bool,

    /// Disable merging consecutive messages from the same sender
    #[arg(long)]
    pub no_merge: bool,

    /// Disable sensitive-data masking
    #[arg(long)]
    pub no_mask: bool,

    /// Label senders by display name instead of single-letter aliases
    #[arg(long)]
    pub full_names: bool,

    /// Extra terms to redact (repeatable, comma-separated)
    #[arg(short, long = "keywords", value_name = "TEXT")]
    pub keywords: Vec<String>,

    /// Read extra terms to redact from a file (one per line or comma-separated)
    #[arg(long, value_name = "PATH")]
    pub keywords_file: Option<PathBuf>,

    /// Zone for dates and times: "local", "utc" or an offset like +08:00
    #[arg(long, value_name = "TZ")]
    pub timezone: Option<Timezone>,

    /// Print run statistics as JSON to stderr
    #[arg(long)]
    pub stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns `true` when cleaned text goes to stdout.
    pub fn writes_to_stdout(&self) -> bool {
        self.output == STDOUT_PATH
    }

    /// Layers the command-line flags over `options`.
    ///
    /// `--keywords` values are appended to any keywords already present.
    /// Terms from `--keywords-file` must be appended separately with
    /// [`append_keywords`].
    pub fn apply_to(&self, mut options: CleanOptions) -> CleanOptions {
        if self.anonymize {
            options.anonymize_users = true;
        }
        if self.remove_time {
            options.remove_time = true;
        }
        if self.keep_system {
            options.remove_system_messages = false;
        }
        if self.keep_media {
            options.simplify_media = false;
        }
        if self.no_merge {
            options.merge_consecutive = false;
        }
        if self.no_mask {
            options.mask_sensitive = false;
        }
        if self.full_names {
            options.use_short_aliases = false;
        }
        if let Some(timezone) = self.timezone {
            options.timezone = timezone;
        }
        for keywords in &self.keywords {
            append_keywords(&mut options, keywords);
        }
        options
    }
}

/// Appends separator-delimited `extra` terms to `options.custom_keywords`.
pub fn append_keywords(options: &mut CleanOptions, extra: &str) {
    let extra = extra.trim();
    if extra.is_empty() {
        return;
    }
    if !options.custom_keywords.trim().is_empty() {
        options.custom_keywords.push('\n');
    }
    options.custom_keywords.push_str(extra);
}
