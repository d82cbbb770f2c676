//! The bot: an outbound IRC client that joins one channel.
//!
//! [`Bot`] holds the session state and turns server lines into replies
//! without doing I/O; [`Bot::run`] drives it over a [`Transport`].

mod dispatch;

pub use dispatch::{BotCommand, BotError, MyInfo, WhoEntry};

use std::collections::BTreeSet;
use std::future::Future;

use microirc_proto::{Message, Prefix, Response, Transport};
use tracing::{debug, info, warn};

/// Reason sent on a normal shutdown.
pub const LEAVING: &str = "Leaving";

/// Session state of a bot.
#[derive(Debug)]
pub struct Bot {
    name: String,
    /// Channel name without the `#`.
    channel: String,
    server_name: Option<String>,
    users_on_channel: BTreeSet<String>,
}

impl Bot {
    pub fn new(name: impl Into<String>, channel: impl Into<String>) -> Self {
        let channel: String = channel.into();
        Self {
            name: name.into(),
            channel: channel.trim_start_matches('#').to_owned(),
            server_name: None,
            users_on_channel: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Server name learned from `004`, if any.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Nicks known to be on the bot's channel.
    pub fn users_on_channel(&self) -> &BTreeSet<String> {
        &self.users_on_channel
    }

    fn channel_target(&self) -> String {
        format!("#{}", self.channel)
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hello, I am {}. Try sending !hello or !slap on the channel, or sending me a private message.",
            self.name
        )
    }

    /// Lines sent right after connecting: register, join, list the
    /// channel and greet it.
    pub fn startup(&self) -> Vec<Message> {
        let channel = self.channel_target();
        vec![
            Message::nick(&self.name),
            Message::user(&self.name, &self.name),
            Message::join(&channel),
            Message::who(&channel),
            Message::privmsg(channel, self.greeting()),
        ]
    }

    /// Reason sent when the bot gives up after a transport error.
    pub fn error_quit_reason(&self) -> String {
        format!("An error has occurred. {} will now disconnect", self.name)
    }

    /// React to one server line. Returns the reply to send, if any.
    pub fn handle(&mut self, msg: &Message) -> Result<Option<Message>, BotError> {
        let reply = match BotCommand::from_message(msg)? {
            BotCommand::Ping { origin: None } => {
                let reply = Message::numeric(Response::ERR_NOORIGIN)
                    .with_param(&self.name)
                    .with_trailing("No origin specified");
                Some(match &self.server_name {
                    Some(server) => reply.with_prefix(Prefix::server(server)),
                    None => reply,
                })
            }
            BotCommand::Ping {
                origin: Some(origin),
            } => {
                let server = self.server_name.clone().unwrap_or_else(|| origin.clone());
                Some(Message::pong(server, origin))
            }
            BotCommand::MyInfo(myinfo) => {
                info!(server = %myinfo.server, version = %myinfo.version, "Server identified");
                self.server_name = Some(myinfo.server);
                None
            }
            BotCommand::WhoReply(entry) => {
                if self.is_own_channel(&entry.channel) {
                    info!(nick = %entry.nick, away = entry.away, "User on channel");
                    self.users_on_channel.insert(entry.nick);
                }
                None
            }
            BotCommand::Joined { nick, channel } => {
                if self.is_own_channel(&channel) {
                    self.users_on_channel.insert(nick);
                }
                None
            }
            BotCommand::Parted { nick, channel } => {
                if self.is_own_channel(&channel) {
                    self.users_on_channel.remove(&nick);
                }
                None
            }
            BotCommand::Quit { nick } => {
                self.users_on_channel.remove(&nick);
                None
            }
            BotCommand::Ignored => None,
        };
        Ok(reply)
    }

    fn is_own_channel(&self, channel: &str) -> bool {
        channel.eq_ignore_ascii_case(&self.channel)
    }

    /// Run the session until `shutdown` resolves or the server goes away.
    ///
    /// On shutdown the bot sends `QUIT :Leaving`. After a fatal transport
    /// error it makes one attempt to send a QUIT explaining the error, then
    /// returns that error.
    pub async fn run<F>(&mut self, mut transport: Transport, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        for msg in self.startup() {
            debug!(raw = %msg, "out");
            transport.write_message(&msg).await?;
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutting down");
                    self.quit(&mut transport, LEAVING.to_owned()).await;
                    return Ok(());
                }
                result = transport.read_message() => match result {
                    Ok(Some(msg)) => {
                        debug!(raw = %msg, "in");
                        match self.handle(&msg) {
                            Ok(Some(reply)) => {
                                debug!(raw = %reply, "out");
                                if let Err(e) = transport.write_message(&reply).await {
                                    let reason = self.error_quit_reason();
                                    self.quit(&mut transport, reason).await;
                                    return Err(e.into());
                                }
                            }
                            Ok(None) => {}
                            Err(e) => warn!(error = %e, raw = %msg, "Skipping line"),
                        }
                    }
                    Ok(None) => {
                        info!("Server closed the connection");
                        return Ok(());
                    }
                    Err(e) if !e.is_fatal() => {
                        warn!(error = %e, "Skipping malformed line");
                    }
                    Err(e) => {
                        let reason = self.error_quit_reason();
                        self.quit(&mut transport, reason).await;
                        return Err(e.into());
                    }
                },
            }
        }
    }

    async fn quit(&self, transport: &mut Transport, reason: String) {
        let msg = Message::quit(Some(reason));
        debug!(raw = %msg, "out");
        if let Err(e) = transport.write_message(&msg).await {
            warn!(error = %e, "Could not send QUIT; the connection may still be open");
        }
        if let Err(e) = transport.close().await {
            warn!(error = %e, "Could not close the connection");
        }
    }
}
