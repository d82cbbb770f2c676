//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use microirc_proto::{Message, Response};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        let (read_half, write_half) = stream.into_split();
        let reader = BufReader::new(read_half);
        let writer = BufWriter::new(write_half);

        Ok(Self {
            reader,
            writer,
            nick: nick.to_string(),
        })
    }

    #[allow(dead_code)]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send a raw IRC line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send an IRC message.
    pub async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.send_raw(&msg.to_string()).await
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed by server");
        }

        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Assert that nothing arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(msg) => anyhow::bail!("unexpected message: {msg}"),
            Err(e) if e.is::<tokio::time::error::Elapsed>() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Wait for end of stream.
    #[allow(dead_code)]
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
            if n == 0 {
                return Ok(());
            }
        }
    }

    /// Receive multiple messages until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Register with the server (NICK + USER), consuming the welcome burst.
    pub async fn register(&mut self) -> anyhow::Result<Vec<Message>> {
        self.send(Message::nick(self.nick.clone())).await?;
        self.send(Message::user(
            self.nick.clone(),
            format!("Test User {}", self.nick),
        ))
        .await?;

        let messages = self
            .recv_until(|msg| msg.response() == Some(Response::RPL_MYINFO))
            .await?;

        if messages
            .iter()
            .any(|msg| msg.response() == Some(Response::RPL_WELCOME))
        {
            Ok(messages)
        } else {
            anyhow::bail!("Registration failed: no RPL_WELCOME received")
        }
    }

    /// Join a channel and wait for our own JOIN echo.
    #[allow(dead_code)]
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send(Message::join(channel)).await?;
        let nick = self.nick.clone();
        self.recv_until(|msg| msg.command == "JOIN" && msg.source_nickname() == Some(nick.as_str()))
            .await?;
        Ok(())
    }

    /// Send a PRIVMSG.
    #[allow(dead_code)]
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send(Message::privmsg(target, text)).await
    }

    /// Send QUIT.
    #[allow(dead_code)]
    pub async fn quit(&mut self, reason: Option<String>) -> anyhow::Result<()> {
        self.send(Message::quit(reason)).await
    }
}
