//! Reply builders shared by handlers.

use microirc_proto::{Message, Prefix, Response};

/// Build a numeric reply from the server: `:<server> <code> <params...>`.
///
/// The last parameter is sent as a trailing argument.
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    let mut msg = Message::numeric(response).with_prefix(Prefix::server(server_name));
    let mut params = params;
    let last = params.pop();
    for param in params {
        msg = msg.with_param(param);
    }
    match last {
        Some(last) => msg.with_trailing(last),
        None => msg,
    }
}

/// Whether `name` is a channel name this server accepts.
pub fn is_channel_name(name: &str) -> bool {
    name.len() > 1
        && name.starts_with('#')
        && !name.contains(|c: char| c.is_whitespace() || c == ',' || c == '\x07')
}

/// Whether `nick` can be used as a nickname.
///
/// Nicknames must never look like a channel, a prefix separator or a
/// trailing argument. `*` stands in for a missing nick in numerics and is
/// never accepted.
pub fn is_valid_nick(nick: &str) -> bool {
    !nick.is_empty()
        && !nick.starts_with(['#', ':'])
        && !nick.contains(|c: char| c.is_whitespace() || matches!(c, ',' | '!' | '@' | '*'))
}
