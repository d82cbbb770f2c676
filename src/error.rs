//! Unified error handling for microircd.
//!
//! Command handlers return [`HandlerError`]; the hub turns each error into
//! the matching numeric reply and keeps the connection open.

use microirc_proto::{Message, Prefix, Response};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("already registered")]
    AlreadyRegistered,

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("not on channel: {0}")]
    NotOnChannel(String),

    #[error("no recipient given")]
    NoRecipient,

    #[error("no text to send")]
    NoTextToSend,

    #[error("no origin specified")]
    NoOrigin,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::AlreadyRegistered => "already_registered",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NotOnChannel(_) => "not_on_channel",
            Self::NoRecipient => "no_recipient",
            Self::NoTextToSend => "no_text_to_send",
            Self::NoOrigin => "no_origin",
            Self::Quit(_) => "quit",
        }
    }

    /// Convert to an IRC error reply message.
    ///
    /// `nick` is the client's current nickname (`*` before one is set) and
    /// `cmd_name` the verb that failed. Returns `None` for [`HandlerError::Quit`].
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let msg = match self {
            Self::NeedMoreParams => Message::numeric(Response::ERR_NEEDMOREPARAMS)
                .with_param(nick)
                .with_param(cmd_name)
                .with_trailing("Not enough parameters"),
            Self::NoNicknameGiven => Message::numeric(Response::ERR_NONICKNAMEGIVEN)
                .with_param(nick)
                .with_trailing("No nickname given"),
            Self::ErroneousNickname(bad_nick) => Message::numeric(Response::ERR_ERRONEOUSNICKNAME)
                .with_param(nick)
                .with_param(bad_nick)
                .with_trailing("Erroneous nickname"),
            Self::NicknameInUse(bad_nick) => Message::numeric(Response::ERR_NICKNAMEINUSE)
                .with_param(nick)
                .with_param(bad_nick)
                .with_trailing("Nickname is already in use"),
            Self::AlreadyRegistered => Message::numeric(Response::ERR_ALREADYREGISTRED)
                .with_param(nick)
                .with_trailing("You may not reregister"),
            Self::NoSuchChannel(bad_chan) => Message::numeric(Response::ERR_NOSUCHCHANNEL)
                .with_param(nick)
                .with_param(bad_chan)
                .with_trailing("No such channel"),
            Self::NotOnChannel(chan) => Message::numeric(Response::ERR_NOTONCHANNEL)
                .with_param(nick)
                .with_param(chan)
                .with_trailing("You're not on that channel"),
            Self::NoRecipient => Message::numeric(Response::ERR_NORECIPIENT)
                .with_param(nick)
                .with_trailing(format!("No recipient given ({cmd_name})")),
            Self::NoTextToSend => Message::numeric(Response::ERR_NOTEXTTOSEND)
                .with_param(nick)
                .with_trailing("No text to send"),
            Self::NoOrigin => Message::numeric(Response::ERR_NOORIGIN)
                .with_param(nick)
                .with_trailing("No origin specified"),

            Self::Quit(_) => return None,
        };

        Some(msg.with_prefix(Prefix::server(server_name)))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
