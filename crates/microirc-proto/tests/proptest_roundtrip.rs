//! Property-based tests for IRC message parsing.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Parsing never panics, whatever the input
//! 2. `:nick!name@host VERB a b :text` re-serializes byte-identically
//! 3. Built messages survive serialize → parse unchanged

use microirc_proto::{Message, Prefix};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z~][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

/// Alphabetic verbs only, so the WHOREPLY grammar never applies.
fn verb_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{1,10}").expect("valid regex")
}

/// Middle argument: no spaces, never starts with a colon.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9#&_\\-][a-zA-Z0-9#&_\\-:]{0,15}").expect("valid regex")
}

/// Message text that doesn't contain CR/LF (which would break IRC protocol)
fn message_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

/// Trailing text that exercises colon and space handling.
fn dangerous_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("".to_string()),
        Just(" ".to_string()),
        Just(":".to_string()),
        Just("::".to_string()),
        Just(": trailing".to_string()),
        Just(":leading".to_string()),
        Just("hello world".to_string()),
        Just("multiple   spaces   here ".to_string()),
        Just("mixed :colon and space".to_string()),
        Just("x".repeat(400)),
    ]
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+")
            .expect("valid regex")
            .prop_map(Prefix::server),
        (
            nickname_strategy(),
            username_strategy(),
            hostname_strategy()
        )
            .prop_map(|(nick, user, host)| Prefix::new(nick, user, host)),
    ]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (
        prop::option::of(prefix_strategy()),
        verb_strategy(),
        prop::collection::vec(middle_strategy(), 0..6),
        prop::option::of(prop_oneof![message_text_strategy(), dangerous_text_strategy()]),
    )
        .prop_map(|(prefix, command, middle, text)| {
            let mut msg = Message::new(command);
            msg.prefix = prefix;
            for arg in middle {
                msg = msg.with_param(arg);
            }
            match text {
                Some(text) => msg.with_trailing(text),
                None => msg,
            }
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Byte-identical round trip for the canonical relayed form.
    #[test]
    fn canonical_line_roundtrip(
        nick in nickname_strategy(),
        name in username_strategy(),
        host in hostname_strategy(),
        verb in verb_strategy(),
        a in middle_strategy(),
        b in middle_strategy(),
        text in message_text_strategy(),
    ) {
        let line = format!(":{nick}!{name}@{host} {verb} {a} {b} :{text}");
        let msg: Message = line.parse().unwrap();

        prop_assert_eq!(msg.prefix.clone(), Some(Prefix::new(nick, name, host)));
        prop_assert_eq!(&msg.command, &verb);
        prop_assert_eq!(msg.args.len(), 3);
        prop_assert!(msg.trailing);
        prop_assert_eq!(msg.to_string(), line);
    }

    /// parse → serialize → parse = identity
    #[test]
    fn message_roundtrip(msg in message_strategy()) {
        let serialized = msg.to_string();
        let reparsed: Message = serialized.parse().unwrap();
        prop_assert_eq!(reparsed, msg);
    }

    /// Arbitrary input yields a value or an error, never a panic.
    #[test]
    fn parse_never_panics(line in "\\PC{0,200}") {
        let _ = line.parse::<Message>();
    }

    /// Arbitrary WHOREPLY argument strings never panic either.
    #[test]
    fn whoreply_never_panics(args in "[ #:a-zHG*@+0-9]{0,60}") {
        let _ = format!(":srv 352 {args}").parse::<Message>();
    }
}
