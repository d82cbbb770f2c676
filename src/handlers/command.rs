//! Typed client commands.

use microirc_proto::Message;

use crate::error::HandlerError;

/// A command a client can send, with its arguments validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    /// `NICK <nickname>`
    Nick(String),
    /// `USER <user> <mode> <unused> :<realname>`; only the real name is kept.
    User { realname: String },
    /// `JOIN <#channel>[,<#channel>...]`
    Join(Vec<String>),
    /// `PART <#channel> [:<reason>]`
    Part {
        channel: String,
        reason: Option<String>,
    },
    /// `PRIVMSG <target> :<text>`
    Privmsg { target: String, text: String },
    /// `QUIT [:<reason>]`
    Quit(Option<String>),
    /// `PING <token>`
    Ping(String),
    /// `PONG ...`
    Pong,
    /// Any other verb.
    Unknown(String),
}

impl ClientCommand {
    /// Validate `msg` into a command.
    ///
    /// Verbs are matched case-insensitively. Missing arguments map to the
    /// numeric the client should receive.
    pub fn from_message(msg: &Message) -> Result<Self, HandlerError> {
        let verb = msg.command.to_ascii_uppercase();
        let cmd = match verb.as_str() {
            "NICK" => {
                let nick = non_empty(msg.arg(0)).ok_or(HandlerError::NoNicknameGiven)?;
                Self::Nick(nick.to_owned())
            }
            "USER" => {
                if msg.args.len() < 4 {
                    return Err(HandlerError::NeedMoreParams);
                }
                Self::User {
                    realname: msg.args[3].clone(),
                }
            }
            "JOIN" => {
                let list = non_empty(msg.arg(0)).ok_or(HandlerError::NeedMoreParams)?;
                Self::Join(
                    list.split(',')
                        .filter(|name| !name.is_empty())
                        .map(str::to_owned)
                        .collect(),
                )
            }
            "PART" => {
                let channel = non_empty(msg.arg(0)).ok_or(HandlerError::NeedMoreParams)?;
                Self::Part {
                    channel: channel.to_owned(),
                    reason: msg.arg(1).map(str::to_owned),
                }
            }
            "PRIVMSG" => {
                let target = non_empty(msg.arg(0)).ok_or(HandlerError::NoRecipient)?;
                let text = non_empty(msg.arg(1)).ok_or(HandlerError::NoTextToSend)?;
                Self::Privmsg {
                    target: target.to_owned(),
                    text: text.to_owned(),
                }
            }
            "QUIT" => Self::Quit(msg.arg(0).map(str::to_owned)),
            "PING" => {
                let token = non_empty(msg.arg(0)).ok_or(HandlerError::NoOrigin)?;
                Self::Ping(token.to_owned())
            }
            "PONG" => Self::Pong,
            _ => Self::Unknown(msg.command.clone()),
        };
        Ok(cmd)
    }
}

fn non_empty(arg: Option<&str>) -> Option<&str> {
    arg.filter(|a| !a.is_empty())
}
