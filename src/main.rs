//! # chatscrub CLI
//!
//! Command-line interface for the chatscrub library.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatscrub::cli::{Args, append_keywords};
use chatscrub::core::{CleanStats, transform_with_stats};
use chatscrub::{ChatscrubError, CleanOptions, Transcript, logging};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatscrubError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    logging::init_cli(args.verbose);

    // Step 1: Resolve options (config file, then flags, then keyword file)
    let base = match &args.config {
        Some(path) => load_options(path)?,
        None => CleanOptions::new(),
    };
    let mut options = args.apply_to(base);
    if let Some(path) = &args.keywords_file {
        append_keywords(&mut options, &read_text(path)?);
    }
    tracing::debug!(?options, "resolved options");

    // Step 2: Load
    let transcript = Transcript::load(&args.input)?;

    // Step 3: Clean
    let (text, stats) = transform_with_stats(&transcript, &options);

    // Step 4: Write
    if args.writes_to_stdout() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
    } else {
        fs::write(&args.output, &text)?;
        print_summary(&args, &text, &stats, total_start);
    }

    if args.stats {
        let json = serde_json::to_string_pretty(&stats)?;
        eprintln!("{}", json);
    }

    Ok(())
}

/// Reads a camelCase JSON options file.
fn load_options(path: &Path) -> Result<CleanOptions, ChatscrubError> {
    let content = read_text(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Reads a whole file as UTF-8, keeping the path in any error.
fn read_text(path: &Path) -> Result<String, ChatscrubError> {
    let bytes = fs::read(path).map_err(|e| ChatscrubError::read(path, e))?;
    String::from_utf8(bytes).map_err(|e| ChatscrubError::Utf8 {
        context: path.display().to_string(),
        source: e,
    })
}

/// Human summary for file output, on stderr.
fn print_summary(args: &Args, text: &str, stats: &CleanStats, started: Instant) {
    eprintln!("📦 chatscrub v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("📂 Input:   {}", args.input.display());
    eprintln!("💾 Output:  {}", args.output);
    eprintln!();
    eprintln!("✅ Done! Output saved to {}", args.output);
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   Messages:  {}", stats.total_messages);
    eprintln!("   Dropped:   {} system, {} empty", stats.system_dropped, stats.empty_dropped);
    eprintln!(
        "   Lines:     {} ({:.1}% reduction)",
        stats.output_lines,
        stats.compression_ratio()
    );
    eprintln!("   Size:      {:.1} KB", text.len() as f64 / 1024.0);
    eprintln!("   Time:      {:.2}s", started.elapsed().as_secs_f64());
}
