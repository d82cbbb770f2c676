//! Channel registry.
//!
//! Channels are created on first JOIN and kept after the last member leaves.
//! Membership is stored on both sides: the channel holds client ids, the
//! client holds channel keys.

use std::collections::{BTreeSet, HashMap};

use microirc_proto::Message;

use super::client::{Client, Delivery};
use super::ClientId;

/// Registry key for a channel or nickname.
pub fn irc_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// A named channel and its members.
#[derive(Debug)]
pub struct Channel {
    /// Name as first joined, including the `#`.
    pub name: String,
    pub members: BTreeSet<ClientId>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn is_member(&self, id: ClientId) -> bool {
        self.members.contains(&id)
    }
}

/// All channels on the server, keyed by [`irc_key`].
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the channel, creating it if absent.
    pub fn ensure(&mut self, name: &str) -> &mut Channel {
        self.channels
            .entry(irc_key(name))
            .or_insert_with(|| Channel::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&irc_key(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&irc_key(name))
    }

    /// Remove `id` from the channel. Returns whether it was a member.
    pub fn remove_member(&mut self, name: &str, id: ClientId) -> bool {
        self.get_mut(name)
            .is_some_and(|channel| channel.members.remove(&id))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Queue `msg` for every member except `sender`.
    ///
    /// Returns the members whose SendQ overflowed.
    pub fn route(
        &self,
        name: &str,
        msg: &Message,
        sender: ClientId,
        clients: &HashMap<ClientId, Client>,
    ) -> Vec<ClientId> {
        self.deliver(name, msg, Some(sender), clients)
    }

    /// Queue `msg` for every member.
    ///
    /// Returns the members whose SendQ overflowed.
    pub fn broadcast(
        &self,
        name: &str,
        msg: &Message,
        clients: &HashMap<ClientId, Client>,
    ) -> Vec<ClientId> {
        self.deliver(name, msg, None, clients)
    }

    fn deliver(
        &self,
        name: &str,
        msg: &Message,
        except: Option<ClientId>,
        clients: &HashMap<ClientId, Client>,
    ) -> Vec<ClientId> {
        let Some(channel) = self.get(name) else {
            return Vec::new();
        };

        let mut overflowed = Vec::new();
        for id in &channel.members {
            if Some(*id) == except {
                continue;
            }
            if let Some(client) = clients.get(id)
                && client.send(msg.clone()) == Delivery::Overflow
            {
                overflowed.push(*id);
            }
        }
        overflowed
    }
}
