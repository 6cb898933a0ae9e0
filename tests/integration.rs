//! Integration tests for the full cleaning pipeline.

use std::fs;

use chatscrub::core::transform_with_stats;
use chatscrub::prelude::*;
use tempfile::tempdir;

// 2024-01-15T10:00:00Z
const T0: i64 = 1705312800;

fn utc() -> CleanOptions {
    CleanOptions::new().with_timezone(Timezone::utc())
}

fn at(sender: &str, offset: i64, content: &str) -> Message {
    Message::new(sender, content).with_create_time(T0 + offset)
}

fn scenario() -> Transcript {
    Transcript::new(
        Session::owned_by("wxid_me"),
        vec![
            at("wxid_bob", 60, "Yes").with_display_name("Bob"),
            at("wxid_me", 0, "Hello"),
            at("wxid_sys", 45, "\"Carol\" joined the group chat").with_kind(MessageKind::System),
            at("wxid_me", 30, "are you there?"),
        ],
    )
}

// =========================================================================
// End-to-end layout
// =========================================================================

#[test]
fn test_end_to_end_default_options() {
    let expected = [
        "--- Chat Session ---",
        "[Legend]",
        "A: Me",
        "B: wxid_sys",
        "C: Bob",
        "[End Legend]",
        "Note: Sensitive data (phones, emails, urls, names) redacted.",
        "",
        "",
        "--- 2024-01-15 ---",
        "[10:00] A: Hello are you there?",
        "[10:01] C: Yes",
    ]
    .join("\n");

    assert_eq!(transform(&scenario(), &utc()), expected);
}

#[test]
fn test_system_messages_kept_when_disabled() {
    let options = utc().with_remove_system_messages(false);
    let out = transform(&scenario(), &options);
    assert!(out.contains("[10:00] B: \"Carol\" joined the group chat"));
}

#[test]
fn test_raw_options_use_full_names() {
    let expected = [
        "--- Chat Session ---",
        "",
        "",
        "--- 2024-01-15 ---",
        "[10:00] Me: Hello",
        "[10:00] Me: are you there?",
        "[10:00] wxid_sys: \"Carol\" joined the group chat",
        "[10:01] Bob: Yes",
    ]
    .join("\n");

    let options = CleanOptions::raw().with_timezone(Timezone::utc());
    assert_eq!(transform(&scenario(), &options), expected);
}

#[test]
fn test_anonymized_without_aliases() {
    let options = utc().with_short_aliases(false).with_anonymize_users(true);
    let out = transform(&scenario(), &options);
    assert!(out.contains("Note: Users have been anonymized."));
    assert!(out.contains("[10:00] User A: Hello are you there?"));
    assert!(out.contains("[10:01] User C: Yes"));
    assert!(!out.contains("Bob"));
}

#[test]
fn test_anonymized_legend_hides_names() {
    let out = transform(&scenario(), &utc().with_anonymize_users(true));
    assert!(out.contains("A: Person A\nB: Person B\nC: Person C"));
    assert!(!out.contains("Bob"));
}

#[test]
fn test_remove_time_layout() {
    let options = utc().with_remove_time(true);
    let out = transform(&scenario(), &options);
    assert!(out.ends_with("redacted.\n\nA: Hello are you there?\nC: Yes"));
    assert!(!out.contains("2024-01-15"));
}

// =========================================================================
// Testable properties
// =========================================================================

#[test]
fn test_determinism() {
    let transcript = scenario();
    let options = utc().with_anonymize_users(true).with_custom_keywords("Hello");
    let first = transform(&transcript, &options);
    for _ in 0..5 {
        assert_eq!(transform(&transcript, &options), first);
    }
}

#[test]
fn test_alias_stability_across_filtering() {
    let transcript = Transcript::new(
        Session::default(),
        vec![
            at("third", 0, "system notice").with_kind(MessageKind::System),
            at("first", 10, "one"),
            at("second", 20, "two"),
        ],
    );

    let filtered = transform(&transcript, &utc());
    let unfiltered = transform(&transcript, &utc().with_remove_system_messages(false));

    for out in [&filtered, &unfiltered] {
        assert!(out.contains("B: first"));
        assert!(out.contains("C: second"));
        assert!(out.contains("[10:00] B: one"));
        assert!(out.contains("[10:00] C: two"));
    }
    assert!(!filtered.contains("system notice"));
    assert!(unfiltered.contains("[10:00] A: system notice"));
}

#[test]
fn test_whitelist_and_particles() {
    let transcript = Transcript::new(
        Session::default(),
        vec![
            at("u1", 0, "so 高兴 today"),
            at("u1", 60, "so 高伟 today"),
            at("u1", 120, "that is 高伟的 book"),
        ],
    );
    let out = transform(&transcript, &utc());
    assert!(out.contains("[10:00] A: so 高兴 today"));
    assert!(out.contains("[10:01] A: so [NAME_REDACTED] today"));
    assert!(out.contains("[10:02] A: that is 高伟的 book"));
}

#[test]
fn test_merge_grouping_breaks_on_sender_and_minute() {
    let transcript = Transcript::new(
        Session::default(),
        vec![
            at("a", 0, "one"),
            at("a", 59, "two"),
            at("b", 59, "three"),
            at("a", 59, "four"),
            at("a", 60, "five"),
        ],
    );
    let out = transform(&transcript, &utc());
    assert!(out.ends_with(
        "[10:00] A: one two\n[10:00] B: three\n[10:00] A: four\n[10:01] A: five"
    ));
}

#[test]
fn test_date_boundary_never_merges() {
    // 23:59:10 and 23:59:50 the next day, same sender and minute string
    let late = T0 + 13 * 3600 + 59 * 60 + 10;
    let transcript = Transcript::new(
        Session::default(),
        vec![
            Message::new("a", "late").with_create_time(late),
            Message::new("a", "next day").with_create_time(late + 86_400 + 40),
        ],
    );
    let out = transform(&transcript, &utc());
    assert!(out.ends_with(
        "\n--- 2024-01-15 ---\n[23:59] A: late\n\n--- 2024-01-16 ---\n[23:59] A: next day"
    ));
}

#[test]
fn test_timezone_shifts_dates() {
    let transcript = Transcript::new(
        Session::default(),
        vec![at("a", 15 * 3600, "hi")], // 2024-01-16T01:00:00Z
    );
    let shanghai = utc().with_timezone("+08:00".parse().unwrap());
    let west = utc().with_timezone("-05:00".parse().unwrap());
    assert!(transform(&transcript, &shanghai).ends_with("--- 2024-01-16 ---\n[09:00] A: hi"));
    assert!(transform(&transcript, &west).ends_with("--- 2024-01-15 ---\n[20:00] A: hi"));
}

#[test]
fn test_empty_transcript() {
    let transcript = Transcript::new(Session::default(), Vec::new());
    assert_eq!(
        transform(&transcript, &utc()),
        "--- Chat Session ---\n[Legend]\n[End Legend]\nNote: Sensitive data (phones, emails, urls, names) redacted.\n"
    );
    assert_eq!(
        transform(&transcript, &CleanOptions::raw()),
        "--- Chat Session ---\n"
    );
}

// =========================================================================
// Masking
// =========================================================================

#[test]
fn test_contact_masking() {
    let transcript = Transcript::new(
        Session::default(),
        vec![at(
            "u1",
            0,
            "mail a@b.com, visit https://x.y/z, call 13800138000 or 021 5555 1234",
        )],
    );
    let out = transform(&transcript, &utc());
    assert!(out.ends_with(
        "[10:00] A: mail [EMAIL], visit [URL] call [NUM_REDACTED] or [PHONE_REDACTED]"
    ));
}

#[test]
fn test_participant_names_masked_only_when_anonymized() {
    let transcript = Transcript::new(
        Session::default(),
        vec![
            at("u1", 0, "hi").with_display_name("Alice"),
            at("u2", 60, "Alice, look").with_display_name("Bob"),
        ],
    );

    let plain = transform(&transcript, &utc());
    assert!(plain.contains("[10:01] B: Alice, look"));

    let anonymized = transform(&transcript, &utc().with_anonymize_users(true));
    assert!(anonymized.contains("[10:01] B: [User A], look"));
}

#[test]
fn test_custom_keywords_longest_first() {
    let transcript = Transcript::new(
        Session::default(),
        vec![at("u1", 0, "Acme Corp bought Acme Labs")],
    );
    let options = utc().with_custom_keywords("Acme，Acme Corp\nLabs");
    let out = transform(&transcript, &options);
    assert!(out.ends_with("[10:00] A: [REDACTED] bought [REDACTED] [REDACTED]"));
}

#[test]
fn test_masking_disabled_keeps_everything() {
    let transcript = Transcript::new(
        Session::default(),
        vec![at("u1", 0, "高伟 13800138000 a@b.com")],
    );
    let options = utc().with_mask_sensitive(false).with_custom_keywords("a@b.com");
    let out = transform(&transcript, &options);
    assert!(out.ends_with("[10:00] A: 高伟 13800138000 a@b.com"));
    assert!(!out.contains("Note: Sensitive"));
}

// =========================================================================
// Bodies
// =========================================================================

#[test]
fn test_media_and_markup() {
    let transcript = Transcript::new(
        Session::default(),
        vec![
            at("u1", 0, "<img cdn=\"x\"/>").with_kind(MessageKind::Image),
            at("u1", 10, "").with_kind(MessageKind::Audio),
            at("u1", 20, "see <msgsource>\n<silence>1</silence>\n</msgsource> this"),
            at("u1", 30, "<msgsource><a/></msgsource>"),
        ],
    );
    let (out, stats) = transform_with_stats(&transcript, &utc());
    assert!(out.ends_with("[10:00] A: [Image] [Audio] see this"));
    assert_eq!(stats.empty_dropped, 1);
}

#[test]
fn test_keep_raw_media() {
    let transcript = Transcript::new(
        Session::default(),
        vec![at("u1", 0, "<img/>").with_kind(MessageKind::Image)],
    );
    let out = transform(&transcript, &utc().with_simplify_media(false));
    assert!(out.ends_with("[10:00] A: <img/>"));
}

// =========================================================================
// JSON input
// =========================================================================

#[test]
fn test_transform_json_camel_case_export() {
    let json = r#"{
        "session": {"wxid": "wxid_me", "nickname": "Group", "type": "group", "messageCount": 4},
        "messages": [
            {"localId": 1, "createTime": 1705312800, "formattedTime": "2024-01-15 10:00:00", "type": "文本消息", "localType": 1, "content": "早", "isSend": 1, "senderUsername": "wxid_me", "senderDisplayName": null, "senderAvatarKey": "k", "source": "", "emojiMd5": null},
            {"createTime": 1705312801, "type": "拍一拍消息", "localType": 10002, "content": "\"Bob\" patted you", "senderUsername": "wxid_bob"},
            {"createTime": 1705312802, "type": 49, "localType": 49, "content": null, "senderUsername": "wxid_bob", "senderDisplayName": "Bob"},
            {"createTime": 1705312803, "localType": 1, "content": "ok", "senderDisplayName": "Nameless"}
        ]
    }"#;

    let out = transform_json(json, &utc()).unwrap();
    assert!(out.contains("A: Me\nB: wxid_bob\nC: Nameless"));
    assert!(out.contains("[10:00] A: 早"));
    assert!(out.contains("[10:00] B: [Link/File]"));
    assert!(out.contains("[10:00] C: ok"));
    assert!(!out.contains("patted"));
}

#[test]
fn test_transform_json_errors() {
    let missing = transform_json(r#"{"session": {}}"#, &utc()).unwrap_err();
    assert!(missing.is_format_error());
    assert!(missing.to_string().contains("'messages' array missing"));

    let wrong_shape = transform_json(r#"{"messages": {"0": {}}}"#, &utc()).unwrap_err();
    assert!(wrong_shape.is_format_error());

    let not_json = transform_json("not json", &utc()).unwrap_err();
    assert!(matches!(not_json, ChatscrubError::Json(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.json");
    fs::write(
        &path,
        r#"{"messages": [{"createTime": 1705312800, "content": "hello", "senderUsername": "u1"}]}"#,
    )
    .unwrap();

    let transcript = Transcript::load(&path).unwrap();
    assert_eq!(transcript.messages.len(), 1);
    assert!(transform(&transcript, &utc()).ends_with("[10:00] A: hello"));

    let err = Transcript::load(dir.path().join("missing.json")).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn test_stats_for_scenario() {
    let (_, stats) = transform_with_stats(&scenario(), &utc());
    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.system_dropped, 1);
    assert_eq!(stats.emitted_messages, 3);
    assert_eq!(stats.output_lines, 2);
    assert_eq!(stats.merged_count(), 1);
    assert_eq!(stats.participants, 3);
}
