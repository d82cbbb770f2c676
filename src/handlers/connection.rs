//! Connection lifecycle commands: NICK, USER, PING and the welcome burst.

use microirc_proto::{Message, Response};
use tracing::info;

use super::helpers::{is_valid_nick, server_reply};
use super::Context;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{irc_key, RegistrationState, PLACEHOLDER_USERNAME};

/// User modes advertised in `004`.
pub const USER_MODES: &str = "i";
/// Channel modes advertised in `004`.
pub const CHANNEL_MODES: &str = "n";

pub(super) const DEFAULT_QUIT_REASON: &str = "Client Quit";

pub(super) fn handle_nick(ctx: &mut Context<'_>, nick: String) -> HandlerResult {
    if !is_valid_nick(&nick) {
        return Err(HandlerError::ErroneousNickname(nick));
    }

    let id = ctx.id;
    let key = irc_key(&nick);
    if let Some(owner) = ctx.matrix.find_nick(&nick)
        && owner != id
    {
        return Err(HandlerError::NicknameInUse(nick));
    }

    let Some(client) = ctx.matrix.client_mut(id) else {
        return Ok(());
    };
    if client.nickname.as_deref() == Some(nick.as_str()) {
        return Ok(());
    }

    let old_prefix = client.prefix();
    let old_nick = client.nickname.replace(nick.clone());
    if let Some(old) = &old_nick {
        ctx.matrix.nicks.remove(&irc_key(old));
    }
    ctx.matrix.nicks.insert(key, id);

    if let Some(old) = old_nick {
        info!(uid = %id, old = %old, new = %nick, "Nick changed");
        let msg = Message::nick(nick).with_prefix(old_prefix);
        ctx.matrix.send_to_peers(id, &msg);
        ctx.reply(msg);
    }

    try_register(ctx);
    Ok(())
}

pub(super) fn handle_user(ctx: &mut Context<'_>, realname: String) -> HandlerResult {
    let Some(client) = ctx.matrix.client_mut(ctx.id) else {
        return Ok(());
    };
    if client.is_registered() {
        return Err(HandlerError::AlreadyRegistered);
    }

    client.username = Some(PLACEHOLDER_USERNAME.to_owned());
    client.realname = Some(realname);

    try_register(ctx);
    Ok(())
}

pub(super) fn handle_ping(ctx: &mut Context<'_>, token: String) {
    let server = ctx.matrix.info.name.clone();
    let pong = Message::pong(server, token).with_prefix(ctx.matrix.server_prefix());
    ctx.reply(pong);
}

/// Send `001`-`004` once both NICK and USER have been seen.
fn try_register(ctx: &mut Context<'_>) {
    let Some(client) = ctx.matrix.client_mut(ctx.id) else {
        return;
    };
    if !client.ready_to_register() {
        return;
    }
    client.state = RegistrationState::Registered;

    let nick = client.nick_or_star().to_owned();
    let prefix = client.prefix();
    info!(uid = %ctx.id, nick = %nick, "Client registered");

    let info = &ctx.matrix.info;
    let burst = [
        server_reply(
            &info.name,
            Response::RPL_WELCOME,
            vec![
                nick.clone(),
                format!("Welcome to the {} IRC Network {}", info.network, prefix),
            ],
        ),
        server_reply(
            &info.name,
            Response::RPL_YOURHOST,
            vec![
                nick.clone(),
                format!(
                    "Your host is {}, running version {}",
                    info.name, info.version
                ),
            ],
        ),
        server_reply(
            &info.name,
            Response::RPL_CREATED,
            vec![
                nick.clone(),
                format!("This server was created {}", info.created.to_rfc2822()),
            ],
        ),
        Message::numeric(Response::RPL_MYINFO)
            .with_prefix(ctx.matrix.server_prefix())
            .with_param(nick)
            .with_param(&info.name)
            .with_param(&info.version)
            .with_param(USER_MODES)
            .with_param(CHANNEL_MODES),
    ];

    for msg in burst {
        ctx.reply(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{drain, Hub};

    #[test]
    fn test_welcome_burst_after_nick_and_user() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.connect();

        hub.line(id, "NICK alice");
        assert!(drain(&mut rx).is_empty());

        hub.line(id, "USER whatever 0 * :Alice");
        let burst = drain(&mut rx);
        assert_eq!(burst.len(), 4);
        assert_eq!(
            burst[0],
            ":irc.test 001 alice :Welcome to the MicroNet IRC Network alice!user@10.0.0.1"
        );
        assert!(burst[1].starts_with(":irc.test 002 alice :Your host is irc.test"));
        assert!(burst[2].starts_with(":irc.test 003 alice :This server was created"));

        let myinfo: microirc_proto::Message = burst[3].parse().unwrap();
        assert_eq!(myinfo.command, "004");
        assert_eq!(myinfo.args.len(), 5);
        assert_eq!(myinfo.args[1], "irc.test");

        let client = hub.matrix.client(id).unwrap();
        assert_eq!(client.username.as_deref(), Some("user"));
        assert_eq!(client.realname.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_user_before_nick_also_registers() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.connect();
        hub.line(id, "USER u 0 * :U");
        hub.line(id, "NICK later");
        assert_eq!(drain(&mut rx).len(), 4);
    }

    #[test]
    fn test_second_user_is_rejected() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.register("alice");
        hub.line(id, "USER again 0 * :Again");
        assert_eq!(drain(&mut rx), [":irc.test 462 alice :You may not reregister"]);
    }

    #[test]
    fn test_nick_in_use() {
        let mut hub = Hub::new();
        let (_alice, _) = hub.register("alice");
        let (id, mut rx) = hub.connect();
        hub.line(id, "NICK ALICE");
        assert_eq!(
            drain(&mut rx),
            [":irc.test 433 * ALICE :Nickname is already in use"]
        );
        assert!(hub.matrix.client(id).unwrap().nickname.is_none());
    }

    #[test]
    fn test_erroneous_and_missing_nick() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.connect();
        hub.line(id, "NICK #chan");
        hub.line(id, "NICK *");
        hub.line(id, "NICK");
        assert_eq!(
            drain(&mut rx),
            [
                ":irc.test 432 * #chan :Erroneous nickname",
                ":irc.test 432 * * :Erroneous nickname",
                ":irc.test 431 * :No nickname given",
            ]
        );
        assert!(hub.matrix.find_nick("*").is_none());
    }

    #[test]
    fn test_nick_change_reaches_self_and_peers() {
        let mut hub = Hub::new();
        let (alice, mut rx_a) = hub.register("alice");
        let (bob, mut rx_b) = hub.register("bob");
        let (_carol, mut rx_c) = hub.register("carol");
        hub.line(alice, "JOIN #c");
        hub.line(bob, "JOIN #c");
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.line(alice, "NICK alicia");
        let expected = [":alice!user@10.0.0.1 NICK alicia"];
        assert_eq!(drain(&mut rx_a), expected);
        assert_eq!(drain(&mut rx_b), expected);
        assert!(drain(&mut rx_c).is_empty());

        assert_eq!(hub.matrix.find_nick("alicia"), Some(alice));
        assert!(hub.matrix.find_nick("alice").is_none());
    }

    #[test]
    fn test_ping_pong() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.connect();
        hub.line(id, "PING :abc");
        hub.line(id, "PING");
        hub.line(id, "PONG irc.test");
        assert_eq!(
            drain(&mut rx),
            [
                ":irc.test PONG irc.test :abc",
                ":irc.test 409 * :No origin specified",
            ]
        );
    }

    #[test]
    fn test_quit_echoes_and_removes() {
        let mut hub = Hub::new();
        let (alice, mut rx_a) = hub.register("alice");
        let (bob, mut rx_b) = hub.register("bob");
        hub.line(alice, "JOIN #c");
        hub.line(bob, "JOIN #c");
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.line(alice, "QUIT :see you");
        let expected = [":alice!user@10.0.0.1 QUIT :see you"];
        assert_eq!(drain(&mut rx_a), expected);
        assert_eq!(drain(&mut rx_b), expected);
        assert!(hub.matrix.client(alice).is_none());
        assert!(hub.matrix.find_nick("alice").is_none());
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut hub = Hub::new();
        let (id, mut rx) = hub.register("alice");
        hub.line(id, "MODE alice +i");
        assert!(drain(&mut rx).is_empty());
        assert!(hub.matrix.client(id).is_some());
    }
}
