//! Example: Using chatscrub as a library
//!
//! This example demonstrates how to use chatscrub in your own projects.
//!
//! Run with: cargo run --example library_usage

use chatscrub::core::Redactor;
use chatscrub::prelude::*;

fn sample() -> Transcript {
    // 2024-01-15T10:00:00Z
    let t0 = 1705312800;
    Transcript::new(
        Session::owned_by("wxid_me"),
        vec![
            Message::new("wxid_me", "Hi! I'm at 我住在北京市朝阳区建国路88号").with_create_time(t0),
            Message::new("wxid_me", "call 138-0013-8000").with_create_time(t0 + 20),
            Message::new("wxid_bob", "")
                .with_display_name("Bob")
                .with_kind(MessageKind::Image)
                .with_create_time(t0 + 40),
            Message::new("wxid_sys", "\"Carol\" joined the group chat")
                .with_kind(MessageKind::System)
                .with_create_time(t0 + 50),
            Message::new("wxid_bob", "Ask Alice about Project Falcon")
                .with_display_name("Bob")
                .with_create_time(t0 + 90),
        ],
    )
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== chatscrub Library Usage Examples ===\n");

    let transcript = sample();

    // Example 1: Default cleaning (aliases, masking, merging)
    println!("1. Default options:");
    let options = CleanOptions::new().with_timezone(Timezone::utc());
    println!("{}\n", transform(&transcript, &options));

    // Example 2: Anonymized, custom keywords, no timestamps
    println!("2. Anonymized with custom keywords:");
    let options = CleanOptions::new()
        .with_anonymize_users(true)
        .with_remove_time(true)
        .with_custom_keywords("Project Falcon, Alice");
    println!("{}\n", transform(&transcript, &options));

    // Example 3: Raw output with statistics
    println!("3. Raw output with statistics:");
    let options = CleanOptions::raw().with_timezone(Timezone::utc());
    let (text, stats) = transform_with_stats(&transcript, &options);
    println!("{}", text);
    println!(
        "   {} messages -> {} lines ({:.1}% reduction)\n",
        stats.total_messages,
        stats.output_lines,
        stats.compression_ratio()
    );

    // Example 4: Redactor on its own
    println!("4. Standalone redactor:");
    let redactor = Redactor::builtin();
    println!("   passes: {:?}", redactor.pass_names());
    println!("   {}", redactor.redact("mail bob@example.com or visit https://example.com"));

    // Example 5: JSON in, text out
    println!("\n5. From JSON:");
    let json = r#"{"messages": [{"createTime": 1705312800, "content": "hello", "senderUsername": "u1"}]}"#;
    println!("{}", transform_json(json, &CleanOptions::new().with_timezone(Timezone::utc()))?);

    println!("\n=== All examples completed successfully! ===");
    Ok(())
}
