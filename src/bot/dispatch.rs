//! Typed view of the lines a bot reacts to.

use microirc_proto::{Message, Response, WhoReply};
use thiserror::Error;

/// Errors raised while interpreting a server line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    #[error("{command} expects {expected} arguments, got {actual}")]
    InvalidArgumentCount {
        command: String,
        expected: usize,
        actual: usize,
    },
}

/// Contents of `004 RPL_MYINFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyInfo {
    pub client: String,
    pub server: String,
    pub version: String,
    pub user_modes: String,
    pub channel_modes: String,
}

/// One entry of a `352 RPL_WHOREPLY` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoEntry {
    /// Channel name without the `#`.
    pub channel: String,
    pub nick: String,
    pub away: bool,
}

/// A server line, classified for the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Ping { origin: Option<String> },
    MyInfo(MyInfo),
    WhoReply(WhoEntry),
    Joined { nick: String, channel: String },
    Parted { nick: String, channel: String },
    Quit { nick: String },
    Ignored,
}

const MYINFO_ARGS: usize = 5;

impl BotCommand {
    pub fn from_message(msg: &Message) -> Result<Self, BotError> {
        if let Some(reply) = WhoReply::from_message(msg) {
            return Ok(Self::WhoReply(WhoEntry {
                channel: reply.channel.to_owned(),
                nick: reply.nick.to_owned(),
                away: reply.is_away(),
            }));
        }

        if msg.response() == Some(Response::RPL_MYINFO) {
            let [client, server, version, user_modes, channel_modes] = msg.args.as_slice() else {
                return Err(BotError::InvalidArgumentCount {
                    command: msg.command.clone(),
                    expected: MYINFO_ARGS,
                    actual: msg.args.len(),
                });
            };
            return Ok(Self::MyInfo(MyInfo {
                client: client.clone(),
                server: server.clone(),
                version: version.clone(),
                user_modes: user_modes.clone(),
                channel_modes: channel_modes.clone(),
            }));
        }

        let source = msg.source_nickname().map(str::to_owned);
        let cmd = match (msg.command.as_str(), source) {
            ("PING", _) => Self::Ping {
                origin: msg.arg(0).map(str::to_owned),
            },
            ("JOIN", Some(nick)) => match msg.arg(0) {
                Some(channel) => Self::Joined {
                    nick,
                    channel: strip_hash(channel),
                },
                None => Self::Ignored,
            },
            ("PART", Some(nick)) => match msg.arg(0) {
                Some(channel) => Self::Parted {
                    nick,
                    channel: strip_hash(channel),
                },
                None => Self::Ignored,
            },
            ("QUIT", Some(nick)) => Self::Quit { nick },
            _ => Self::Ignored,
        };
        Ok(cmd)
    }
}

fn strip_hash(channel: &str) -> String {
    channel.strip_prefix('#').unwrap_or(channel).to_owned()
}
