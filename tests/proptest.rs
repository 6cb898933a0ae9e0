//! Property-based tests for chatscrub.
//!
//! These tests generate random transcripts and option sets to find edge cases.

use proptest::prelude::*;

use chatscrub::config::{CleanOptions, Timezone};
use chatscrub::core::identity::IdentityTable;
use chatscrub::core::{Redactor, transform, transform_with_stats};
use chatscrub::message::{Message, MessageKind};
use chatscrub::transcript::{Session, Transcript};

// 2024-01-15T10:00:00Z
const T0: i64 = 1705312800;

/// Generate a random Message using fast strategies (no regex!)
fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop::sample::select(vec!["wxid_a", "wxid_b", "wxid_c", "", "wxid_sys"]),
        prop::sample::select(vec![
            "Hello".to_string(),
            "好的".to_string(),
            "我很高兴见到你".to_string(),
            "call 13800138000".to_string(),
            "mail a@b.com".to_string(),
            "see https://example.com".to_string(),
            "Привет мир".to_string(),
            "a<msgsource><x/></msgsource>b".to_string(),
            String::new(),
            "   ".to_string(),
            "🎉🔥💀 emoji".to_string(),
        ]),
        prop::sample::select(vec![
            MessageKind::Text,
            MessageKind::Image,
            MessageKind::System,
            MessageKind::Link,
            MessageKind::Other(48),
        ]),
        0i64..(3 * 86_400),
    )
        .prop_map(|(sender, content, kind, offset)| {
            Message::new(sender, content)
                .with_kind(kind)
                .with_create_time(T0 + offset)
        })
}

/// Generate a vector of random messages
fn arb_messages(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message(), 0..max_len)
}

fn arb_options() -> impl Strategy<Value = CleanOptions> {
    prop::array::uniform7(any::<bool>()).prop_map(|flags| CleanOptions {
        anonymize_users: flags[0],
        remove_time: flags[1],
        remove_system_messages: flags[2],
        simplify_media: flags[3],
        merge_consecutive: flags[4],
        mask_sensitive: flags[5],
        use_short_aliases: flags[6],
        custom_keywords: String::new(),
        timezone: Timezone::utc(),
    })
}

fn transcript(messages: Vec<Message>) -> Transcript {
    Transcript::new(Session::owned_by("wxid_a"), messages)
}

fn legend(text: &str) -> Vec<&str> {
    text.lines()
        .skip_while(|l| *l != "[Legend]")
        .take_while(|l| *l != "[End Legend]")
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // PIPELINE PROPERTIES
    // ============================================

    /// Same input and options always give the same bytes
    #[test]
    fn transform_is_deterministic(messages in arb_messages(30), options in arb_options()) {
        let t = transcript(messages);
        prop_assert_eq!(transform(&t, &options), transform(&t, &options));
    }

    /// Output always opens with the session banner
    #[test]
    fn output_starts_with_banner(messages in arb_messages(30), options in arb_options()) {
        let out = transform(&transcript(messages), &options);
        prop_assert!(out.starts_with("--- Chat Session ---"));
    }

    /// Every input message is accounted for exactly once
    #[test]
    fn stats_account_for_every_message(messages in arb_messages(30), options in arb_options()) {
        let total = messages.len();
        let (_, stats) = transform_with_stats(&transcript(messages), &options);
        prop_assert_eq!(stats.total_messages, total);
        prop_assert_eq!(
            stats.emitted_messages + stats.system_dropped + stats.empty_dropped,
            total
        );
        prop_assert!(stats.output_lines <= stats.emitted_messages);
    }

    /// Without merging, each emitted message gets its own line
    #[test]
    fn no_merge_means_one_line_per_message(messages in arb_messages(30), options in arb_options()) {
        let options = options.with_merge_consecutive(false);
        let (_, stats) = transform_with_stats(&transcript(messages), &options);
        prop_assert_eq!(stats.output_lines, stats.emitted_messages);
        prop_assert_eq!(stats.merged_count(), 0);
    }

    /// Filtering system messages never changes the legend
    #[test]
    fn aliases_ignore_system_filter(messages in arb_messages(30)) {
        let t = transcript(messages);
        let options = CleanOptions::new().with_timezone(Timezone::utc());
        let filtered = transform(&t, &options);
        let unfiltered = transform(&t, &options.clone().with_remove_system_messages(false));
        prop_assert_eq!(legend(&filtered), legend(&unfiltered));
    }

    /// Same sender within one minute collapses to one line, in order
    #[test]
    fn same_minute_merges_in_order(
        words in prop::collection::vec(
            prop::sample::select(vec!["alpha", "beta", "gamma", "delta", "ok"]),
            1..10,
        )
    ) {
        let messages: Vec<Message> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Message::new("u", *w).with_create_time(T0 + i as i64))
            .collect();
        let options = CleanOptions::new().with_timezone(Timezone::utc());
        let out = transform(&transcript(messages), &options);
        let expected = format!("[10:00] A: {}", words.join(" "));
        prop_assert_eq!(out.lines().last(), Some(expected.as_str()));
    }

    // ============================================
    // REDACTION PROPERTIES
    // ============================================

    /// Running the passes twice changes nothing more
    #[test]
    fn redaction_is_idempotent(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                "hello",
                "so 高兴 today",
                "高伟",
                "张三了",
                "mail a@b.com",
                "https://example.com/x",
                "13800138000",
                "138-0013-8000",
                "我住在北京市朝阳区",
                "[URL]",
                "[NAME_REDACTED]",
                "12345",
                "Привет",
                "🎉",
            ]),
            0..12,
        )
    ) {
        let redactor = Redactor::builtin();
        let text = parts.join(" ");
        let once = redactor.redact(&text);
        prop_assert_eq!(redactor.redact(&once), once);
    }

    /// Custom keywords never survive redaction
    #[test]
    fn keywords_never_survive(
        keywords in prop::collection::vec(
            prop::sample::select(vec!["acme", "acme corp", "falcon", "corp", "springfield"]),
            1..4,
        ),
        filler in prop::collection::vec(
            prop::sample::select(vec!["acme", "corp", "falcon", "hello", "acmecorp", "springfield", " "]),
            0..20,
        )
    ) {
        let options = CleanOptions::new().with_custom_keywords(keywords.join(","));
        let redactor = Redactor::from_options(&options, &IdentityTable::default());
        let out = redactor.redact(&filler.join(" "));
        for keyword in &keywords {
            prop_assert!(!out.contains(keyword), "{} survived in {}", keyword, out);
        }
    }

    // ============================================
    // ROBUSTNESS PROPERTIES
    // ============================================

    /// Arbitrary JSON-ish bodies never panic the pipeline
    #[test]
    fn transform_never_panics_on_arbitrary_bodies(body in any::<String>(), options in arb_options()) {
        let t = transcript(vec![Message::new("u", body).with_create_time(T0)]);
        let _ = transform(&t, &options.with_custom_keywords("x,y"));
    }
}
