//! Integration tests for error handling scenarios.
//!
//! These tests verify that malformed lines are rejected with the right
//! error, and that well-formed numerics with irregular grammar parse.

use microirc_proto::{Message, MessageParseError, WhoReply};

#[test]
fn test_empty_prefix_always_fails() {
    for line in [":", ": ", ":\t", ":  PRIVMSG #a :x"] {
        assert_eq!(
            line.parse::<Message>(),
            Err(MessageParseError::EmptyPrefix),
            "{line:?}"
        );
    }
}

#[test]
fn test_missing_command() {
    for line in ["", "   ", "\r\n", ":nick!user@host"] {
        assert_eq!(
            line.parse::<Message>(),
            Err(MessageParseError::MissingCommand),
            "{line:?}"
        );
    }
}

#[test]
fn test_ping_without_args() {
    let msg: Message = "PING".parse().unwrap();
    assert_eq!(msg.command, "PING");
    assert!(msg.args.is_empty());
}

#[test]
fn test_myinfo_has_five_args() {
    let msg: Message = ":irc.example.net 004 mybot irc.example.net v1 ov be"
        .parse()
        .unwrap();
    assert_eq!(msg.command, "004");
    assert_eq!(msg.args.len(), 5);
}

#[test]
fn test_whoreply_channel_first() {
    let msg: Message = ":irc.example.net 352 #test mybot user host server nick H :0 Real Name"
        .parse()
        .unwrap();
    assert_eq!(msg.args.len(), 11);
    assert!(msg.trailing);

    let reply = WhoReply::from_message(&msg).unwrap();
    assert_eq!(reply.client, "mybot");
    assert_eq!(reply.channel, "test");
    assert_eq!(reply.hopcount, "0");
    assert_eq!(reply.realname, "Real Name");
    assert_eq!(reply.oper, "");
    assert_eq!(reply.status, "");
}

#[test]
fn test_whoreply_deviation_reports_position() {
    let err = ":srv 352 me #c u h s n H 0 x".parse::<Message>().unwrap_err();
    assert_eq!(
        err,
        MessageParseError::InvalidArguments {
            command: "352".into(),
            position: 16,
        }
    );
    assert_eq!(err.to_string(), "invalid arguments for 352 at position 16");
}

#[test]
fn test_other_numerics_use_general_grammar() {
    let msg: Message = ":srv 353 me = #c :a b c".parse().unwrap();
    assert_eq!(msg.args, ["me", "=", "#c", "a b c"]);
}

#[test]
fn test_invalid_prefix_is_reported() {
    let err = ":@host PRIVMSG #a :x".parse::<Message>().unwrap_err();
    assert_eq!(err, MessageParseError::InvalidPrefix("@host".into()));
}
