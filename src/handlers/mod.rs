//! IRC command handlers.
//!
//! Incoming lines are turned into a typed [`ClientCommand`] and applied to
//! the [`Matrix`] by the handler for that verb. Handlers run inside the hub
//! task and never block; replies go onto SendQs.

mod channel;
mod command;
mod connection;
mod helpers;
mod messaging;

pub use command::ClientCommand;
pub use connection::{CHANNEL_MODES, USER_MODES};
pub use helpers::server_reply;

use microirc_proto::Message;
use tracing::debug;

use crate::error::{HandlerError, HandlerResult};
use crate::state::{Client, ClientId, Matrix};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The client that sent the command.
    pub id: ClientId,
    /// Server state.
    pub matrix: &'a mut Matrix,
}

impl Context<'_> {
    /// The sending client. Present for the whole dispatch.
    pub fn client(&self) -> Option<&Client> {
        self.matrix.client(self.id)
    }

    /// Current nickname, or `*` before one is set.
    pub fn nick_or_star(&self) -> String {
        self.client()
            .map(|c| c.nick_or_star().to_owned())
            .unwrap_or_else(|| "*".to_owned())
    }

    /// Queue a message for the sending client.
    pub fn reply(&mut self, msg: Message) {
        self.matrix.send_to(self.id, msg);
    }

    /// Turn a handler error into its numeric reply.
    fn reply_error(&mut self, err: &HandlerError, cmd_name: &str) {
        let nick = self.nick_or_star();
        if let Some(reply) = err.to_irc_reply(&self.matrix.info.name, &nick, cmd_name) {
            self.reply(reply);
        }
    }
}

/// Apply one message from client `id` to the hub.
pub fn dispatch(matrix: &mut Matrix, id: ClientId, msg: Message) {
    let mut ctx = Context { id, matrix };
    let cmd_name = msg.command.to_ascii_uppercase();

    let result = ClientCommand::from_message(&msg).and_then(|cmd| handle(&mut ctx, cmd));

    match result {
        Ok(()) => {}
        Err(HandlerError::Quit(reason)) => {
            let reason = reason.unwrap_or_else(|| connection::DEFAULT_QUIT_REASON.to_owned());
            ctx.matrix.disconnect(id, &reason);
        }
        Err(err) => {
            debug!(
                uid = %id,
                command = %cmd_name,
                error = err.error_code(),
                "Command failed"
            );
            ctx.reply_error(&err, &cmd_name);
        }
    }
}

fn handle(ctx: &mut Context<'_>, cmd: ClientCommand) -> HandlerResult {
    match cmd {
        ClientCommand::Nick(nick) => connection::handle_nick(ctx, nick),
        ClientCommand::User { realname } => connection::handle_user(ctx, realname),
        ClientCommand::Join(channels) => {
            channel::handle_join(ctx, channels);
            Ok(())
        }
        ClientCommand::Part { channel, reason } => channel::handle_part(ctx, &channel, reason),
        ClientCommand::Privmsg { target, text } => messaging::handle_privmsg(ctx, &target, text),
        ClientCommand::Quit(reason) => Err(HandlerError::Quit(reason)),
        ClientCommand::Ping(token) => {
            connection::handle_ping(ctx, token);
            Ok(())
        }
        ClientCommand::Pong => Ok(()),
        ClientCommand::Unknown(verb) => {
            debug!(uid = %ctx.id, command = %verb, "Ignoring unknown command");
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::ServerConfig;
    use crate::state::{MatrixEvent, ServerInfo, UidGenerator};

    /// Drives a [`Matrix`] directly, without sockets.
    pub struct Hub {
        pub matrix: Matrix,
        uid_gen: UidGenerator,
    }

    impl Hub {
        pub fn new() -> Self {
            let config = ServerConfig {
                name: "irc.test".into(),
                ..ServerConfig::default()
            };
            Self {
                matrix: Matrix::new(ServerInfo::from_config(&config)),
                uid_gen: UidGenerator::new(),
            }
        }

        pub fn connect(&mut self) -> (ClientId, mpsc::Receiver<Message>) {
            let (tx, rx) = mpsc::channel(256);
            let id = self.uid_gen.next();
            self.matrix.handle_event(MatrixEvent::Connect {
                id,
                addr: "10.0.0.1:40000".parse().unwrap(),
                sender: tx,
            });
            (id, rx)
        }

        pub fn line(&mut self, id: ClientId, raw: &str) {
            self.matrix.handle_event(MatrixEvent::Line {
                id,
                message: raw.parse().unwrap(),
            });
        }

        /// Connect and complete NICK/USER, discarding the welcome burst.
        pub fn register(&mut self, nick: &str) -> (ClientId, mpsc::Receiver<Message>) {
            let (id, mut rx) = self.connect();
            self.line(id, &format!("NICK {nick}"));
            self.line(id, &format!("USER {nick} 0 * :{nick}"));
            drain(&mut rx);
            (id, rx)
        }
    }

    pub fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg.to_string());
        }
        out
    }
}
