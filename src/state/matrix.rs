//! The Matrix - single-owner hub for all server state.
//!
//! One task owns the client arena, the nick index and the channel registry.
//! Connection tasks never touch that state; they talk to the hub through
//! [`MatrixEvent`]s on a bounded channel, and the hub answers through each
//! client's SendQ. Events are handled one at a time, so lines from one
//! connection take effect in the order they were read.

use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use microirc_proto::{Message, Prefix};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::channel::{irc_key, ChannelRegistry};
use super::client::{Client, Delivery};
use super::{ClientId, UidGenerator};
use crate::config::ServerConfig;
use crate::handlers;

/// Reason given when a client's SendQ fills up.
pub const SENDQ_EXCEEDED: &str = "SendQ exceeded";

/// Events sent from connection tasks to the hub.
#[derive(Debug)]
pub enum MatrixEvent {
    /// A new connection was accepted.
    Connect {
        id: ClientId,
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
    },
    /// A line was read and parsed.
    Line { id: ClientId, message: Message },
    /// The connection ended without a QUIT.
    Disconnect { id: ClientId, reason: String },
}

/// This server's identity.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub version: String,
    pub created: DateTime<Utc>,
}

impl ServerInfo {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            network: config.network.clone(),
            version: config.version.clone(),
            created: Utc::now(),
        }
    }
}

/// Cloneable handle used by connection tasks to reach the hub.
#[derive(Debug, Clone)]
pub struct MatrixHandle {
    tx: mpsc::Sender<MatrixEvent>,
    uid_gen: Arc<UidGenerator>,
}

impl MatrixHandle {
    /// Allocate an id for a new connection.
    pub fn next_id(&self) -> ClientId {
        self.uid_gen.next()
    }

    /// Deliver an event to the hub. Fails only once the hub has stopped.
    pub async fn send(&self, event: MatrixEvent) -> Result<(), mpsc::error::SendError<MatrixEvent>> {
        self.tx.send(event).await
    }
}

/// The Matrix - all clients, nicks and channels.
#[derive(Debug)]
pub struct Matrix {
    pub info: ServerInfo,
    pub(crate) clients: HashMap<ClientId, Client>,
    /// Lowercased nickname to owner.
    pub(crate) nicks: HashMap<String, ClientId>,
    pub(crate) channels: ChannelRegistry,
    /// Clients whose SendQ overflowed during the current event.
    overflowed: Vec<ClientId>,
}

impl Matrix {
    pub fn new(info: ServerInfo) -> Self {
        Self {
            info,
            clients: HashMap::new(),
            nicks: HashMap::new(),
            channels: ChannelRegistry::new(),
            overflowed: Vec::new(),
        }
    }

    /// Spawn the hub task and return a handle to it.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn(self, event_queue: usize) -> (MatrixHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(event_queue);
        let task = tokio::spawn(self.run(rx));
        let handle = MatrixHandle {
            tx,
            uid_gen: Arc::new(UidGenerator::new()),
        };
        (handle, task)
    }

    /// The main hub loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<MatrixEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!("Matrix event channel closed");
    }

    /// Apply one event, then disconnect anyone whose SendQ overflowed.
    pub fn handle_event(&mut self, event: MatrixEvent) {
        match event {
            MatrixEvent::Connect { id, addr, sender } => {
                info!(uid = %id, %addr, "Client connected");
                self.clients.insert(id, Client::new(id, addr, sender));
            }
            MatrixEvent::Line { id, message } => {
                if !self.clients.contains_key(&id) {
                    debug!(uid = %id, "Line from unknown client ignored");
                    return;
                }
                debug!(uid = %id, raw = %message, "Received message");
                handlers::dispatch(self, id, message);
            }
            MatrixEvent::Disconnect { id, reason } => {
                self.disconnect(id, &reason);
            }
        }
        self.reap();
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Look up a client by nickname, case-insensitively.
    pub fn find_nick(&self, nick: &str) -> Option<ClientId> {
        self.nicks.get(&irc_key(nick)).copied()
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn server_prefix(&self) -> Prefix {
        Prefix::server(&self.info.name)
    }

    /// Queue `msg` for one client.
    pub fn send_to(&mut self, id: ClientId, msg: Message) {
        if let Some(client) = self.clients.get(&id)
            && client.send(msg) == Delivery::Overflow
        {
            self.overflowed.push(id);
        }
    }

    /// Queue `msg` once for every client sharing a channel with `id`.
    pub fn send_to_peers(&mut self, id: ClientId, msg: &Message) {
        let peers = self.peers_of(id);
        for peer in peers {
            self.send_to(peer, msg.clone());
        }
    }

    /// Queue `msg` for every member of `channel` except `sender`.
    pub fn route(&mut self, channel: &str, msg: &Message, sender: ClientId) {
        let overflowed = self.channels.route(channel, msg, sender, &self.clients);
        self.overflowed.extend(overflowed);
    }

    /// Queue `msg` for every member of `channel`.
    pub fn broadcast(&mut self, channel: &str, msg: &Message) {
        let overflowed = self.channels.broadcast(channel, msg, &self.clients);
        self.overflowed.extend(overflowed);
    }

    fn peers_of(&self, id: ClientId) -> BTreeSet<ClientId> {
        let Some(client) = self.clients.get(&id) else {
            return BTreeSet::new();
        };
        client
            .channels
            .iter()
            .filter_map(|name| self.channels.get(name))
            .flat_map(|channel| channel.members.iter().copied())
            .filter(|member| *member != id)
            .collect()
    }

    /// Remove a client everywhere, telling it and its channel peers.
    ///
    /// Dropping the client's sender lets its connection task flush what is
    /// queued and close.
    pub fn disconnect(&mut self, id: ClientId, reason: &str) {
        let Some(prefix) = self.clients.get(&id).map(Client::prefix) else {
            return;
        };

        let quit = Message::quit(Some(reason.to_owned())).with_prefix(prefix);
        self.send_to_peers(id, &quit);
        self.send_to(id, quit);

        let Some(client) = self.clients.remove(&id) else {
            return;
        };
        for name in &client.channels {
            self.channels.remove_member(name, id);
        }
        if let Some(nick) = &client.nickname {
            let key = irc_key(nick);
            if self.nicks.get(&key) == Some(&id) {
                self.nicks.remove(&key);
            }
        }

        info!(
            uid = %id,
            nick = client.nick_or_star(),
            reason,
            "Client disconnected"
        );
    }

    /// Disconnect clients whose SendQ overflowed. Their QUIT may overflow
    /// further clients, which are handled in the same pass.
    fn reap(&mut self) {
        while let Some(id) = self.overflowed.pop() {
            if self.clients.contains_key(&id) {
                warn!(uid = %id, "SendQ exceeded, disconnecting");
                self.disconnect(id, SENDQ_EXCEEDED);
            }
        }
    }
}
