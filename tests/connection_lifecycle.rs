//! Integration tests for registration, keepalive and disconnects.

mod common;

use common::TestServer;
use common::server::SERVER_NAME;
use microirc_proto::{Message, Response};
use std::time::Duration;

#[tokio::test]
async fn test_registration_welcome_burst() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("alice").await.expect("Failed to connect");

    let burst = client.register().await.expect("Registration failed");
    let codes: Vec<_> = burst.iter().filter_map(Message::response).collect();
    assert_eq!(
        codes,
        [
            Response::RPL_WELCOME,
            Response::RPL_YOURHOST,
            Response::RPL_CREATED,
            Response::RPL_MYINFO
        ]
    );

    let myinfo = burst.last().unwrap();
    assert_eq!(myinfo.args.len(), 5);
    assert_eq!(myinfo.args[0], "alice");
    assert_eq!(myinfo.args[1], SERVER_NAME);
    assert_eq!(myinfo.source_nickname(), Some(SERVER_NAME));
}

#[tokio::test]
async fn test_ping_pong() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("pinger").await.expect("Failed to connect");

    client.send_raw("PING :token-123").await.unwrap();
    let pong = client.recv().await.unwrap();
    assert_eq!(pong.command, "PONG");
    assert_eq!(pong.args, [SERVER_NAME, "token-123"]);
}

#[tokio::test]
async fn test_malformed_lines_keep_connection() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("sloppy").await.expect("Failed to connect");

    client.send_raw(":").await.unwrap();
    client.send_raw(": PRIVMSG #x :empty prefix").await.unwrap();
    client.send_raw("").await.unwrap();
    let long = format!("PRIVMSG #x :{}", "A".repeat(600));
    client.send_raw(&long).await.unwrap();

    client.send_raw("PING :still-here").await.unwrap();
    let pong = client.recv().await.expect("connection should survive bad lines");
    assert_eq!(pong.command, "PONG");
    assert_eq!(pong.arg(1), Some("still-here"));
}

#[tokio::test]
async fn test_nick_in_use() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let _alice = server.connect_registered("alice").await.unwrap();

    let mut imposter = server.connect("alice").await.unwrap();
    imposter.send_raw("NICK Alice").await.unwrap();
    let reply = imposter.recv().await.unwrap();
    assert_eq!(reply.response(), Some(Response::ERR_NICKNAMEINUSE));
    assert_eq!(reply.args, ["*", "Alice", "Nickname is already in use"]);
}

#[tokio::test]
async fn test_commands_are_case_insensitive() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect("lower").await.unwrap();

    client.send_raw("nick lower").await.unwrap();
    client.send_raw("user lower 0 * :Lower Case").await.unwrap();
    let burst = client
        .recv_until(|msg| msg.response() == Some(Response::RPL_MYINFO))
        .await
        .unwrap();
    assert_eq!(burst[0].response(), Some(Response::RPL_WELCOME));
}

#[tokio::test]
async fn test_quit_closes_connection() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect_registered("leaver").await.unwrap();

    client.quit(Some("bye".to_string())).await.unwrap();
    let echo = client.recv().await.unwrap();
    assert_eq!(echo.command, "QUIT");
    assert_eq!(echo.args, ["bye"]);
    assert_eq!(echo.source_nickname(), Some("leaver"));

    client.expect_closed().await.unwrap();

    // The nickname is free again.
    let mut again = server.connect("leaver").await.unwrap();
    again.register().await.unwrap();
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let mut client = server.connect_registered("curious").await.unwrap();

    client.send_raw("MOTD").await.unwrap();
    client.expect_silence(Duration::from_millis(200)).await.unwrap();
}
