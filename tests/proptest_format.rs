//! Property-based tests for the formatting codec, the line parser and the
//! participant color cache.
//!
//! Run with: `cargo test --test proptest_format`

use proptest::prelude::*;
use slirc_client::format::{self, FORMAT_CHARS};
use slirc_client::{Client, ClientConfig, Message, NickColor, NickColorCache};

/// Text with no formatting control bytes.
fn plain_text() -> impl Strategy<Value = String> {
    "[^\x02\x03\x04\x0f\x16\x1d\x1f]{0,64}"
}

/// Text with control codes and color parameters sprinkled in.
fn formatted_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z ,0-9]{1,8}",
            Just("\x02".to_string()),
            Just("\x0f".to_string()),
            Just("\x16".to_string()),
            Just("\x1d".to_string()),
            Just("\x1f".to_string()),
            (0u8..120, prop::option::of(0u8..120)).prop_map(|(fg, bg)| match bg {
                Some(bg) => format!("\x03{},{}", fg, bg),
                None => format!("\x03{}", fg),
            }),
            "\x04[0-9a-fA-F]{0,6}",
        ],
        0..16,
    )
    .prop_map(|parts| parts.concat())
}

fn nickname() -> impl Strategy<Value = String> {
    "[a-zA-Z\\[\\]\\\\`_^{|}][a-zA-Z0-9\\[\\]\\\\`_^{|}-]{0,15}"
}

proptest! {
    #[test]
    fn strip_is_idempotent(text in formatted_text()) {
        let once = format::strip(&text);
        prop_assert_eq!(format::strip(&once), once.clone());
        prop_assert!(!once.chars().any(|c| FORMAT_CHARS.contains(&c)));
    }

    #[test]
    fn plain_text_is_one_unstyled_run(text in plain_text()) {
        let runs = format::encode(&text);
        prop_assert_eq!(runs.len(), 1);
        prop_assert!(runs[0].style.is_plain());
        prop_assert_eq!(&runs[0].text, &text);
    }

    #[test]
    fn runs_concatenate_to_stripped_text(text in formatted_text()) {
        let joined: String = format::encode(&text).into_iter().map(|run| run.text).collect();
        prop_assert_eq!(joined, format::strip(&text));
    }

    #[test]
    fn parse_never_panics(line in ".{0,256}") {
        let msg = Message::parse(&line);
        prop_assert_eq!(msg.command.clone(), msg.command.to_ascii_uppercase());
    }

    #[test]
    fn feed_line_never_panics(lines in prop::collection::vec(".{0,128}", 0..8)) {
        let mut client = Client::new(ClientConfig::new("bob")).unwrap();
        let _ = client.start();
        for line in &lines {
            let _ = client.feed_line(line);
        }
        prop_assert!(client.state().target("Status").is_some());
        prop_assert!(client.state().target("Hilights").is_some());
    }

    #[test]
    fn colors_are_deterministic(name in nickname(), capacity in 1usize..4) {
        let mut cache = NickColorCache::new(capacity);
        let first = cache.color_of(&name);
        // Push the name out, then ask again.
        for filler in 0..capacity {
            let _ = cache.color_of(&format!("filler{}", filler));
        }
        prop_assert_eq!(cache.color_of(&name), first);
        prop_assert_eq!(NickColor::for_name(&name), first);
        prop_assert!(first.hue < 360);
    }
}
