//! Per-connection client state, owned by the hub.

use std::collections::BTreeSet;
use std::net::SocketAddr;

use microirc_proto::{Message, Prefix};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::ClientId;

/// Fixed identity given to every USER, whatever the client asked for.
pub const PLACEHOLDER_USERNAME: &str = "user";

/// Where a client is in the registration handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    /// Connected; NICK and/or USER still outstanding.
    Connected,
    /// Both NICK and USER seen and the welcome burst sent.
    Registered,
}

/// Outcome of queueing a line on a client's SendQ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// The SendQ is full; the client must be disconnected.
    Overflow,
    /// The connection task is already gone.
    Closed,
}

/// One connected client.
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub nickname: Option<String>,
    pub username: Option<String>,
    pub realname: Option<String>,
    pub host: String,
    pub port: u16,
    /// Names of channels joined (lowercase keys into the registry).
    pub channels: BTreeSet<String>,
    pub state: RegistrationState,
    sender: mpsc::Sender<Message>,
}

impl Client {
    pub fn new(id: ClientId, addr: SocketAddr, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            nickname: None,
            username: None,
            realname: None,
            host: addr.ip().to_string(),
            port: addr.port(),
            channels: BTreeSet::new(),
            state: RegistrationState::Connected,
            sender,
        }
    }

    /// Nickname for numeric replies, `*` before one is set.
    pub fn nick_or_star(&self) -> &str {
        self.nickname.as_deref().unwrap_or("*")
    }

    /// Source prefix for lines this client originates: `nick!user@host`.
    pub fn prefix(&self) -> Prefix {
        Prefix {
            nick: self.nick_or_star().to_owned(),
            name: self.username.clone(),
            host: Some(self.host.clone()),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    /// Whether both NICK and USER have been seen but the welcome is not out yet.
    pub fn ready_to_register(&self) -> bool {
        self.state == RegistrationState::Connected
            && self.nickname.is_some()
            && self.username.is_some()
    }

    /// Queue `msg` on this client's SendQ without waiting.
    pub fn send(&self, msg: Message) -> Delivery {
        match self.sender.try_send(msg) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => Delivery::Overflow,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UidGenerator;

    fn client(capacity: usize) -> (Client, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity);
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        (Client::new(UidGenerator::new().next(), addr, tx), rx)
    }

    #[test]
    fn test_prefix_before_and_after_registration() {
        let (mut c, _rx) = client(4);
        assert_eq!(c.prefix().to_string(), "*@127.0.0.1");

        c.nickname = Some("alice".into());
        c.username = Some(PLACEHOLDER_USERNAME.into());
        assert_eq!(c.prefix().to_string(), "alice!user@127.0.0.1");
        assert!(c.ready_to_register());

        c.state = RegistrationState::Registered;
        assert!(!c.ready_to_register());
        assert!(c.is_registered());
    }

    #[test]
    fn test_send_reports_overflow() {
        let (c, mut rx) = client(1);
        assert_eq!(c.send(Message::ping("a")), Delivery::Queued);
        assert_eq!(c.send(Message::ping("b")), Delivery::Overflow);
        assert_eq!(rx.try_recv().unwrap(), Message::ping("a"));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (c, rx) = client(1);
        drop(rx);
        assert_eq!(c.send(Message::ping("a")), Delivery::Closed);
    }
}
