//! Channel membership commands: JOIN and PART.

use microirc_proto::Message;
use tracing::debug;

use super::helpers::is_channel_name;
use super::Context;
use crate::error::{HandlerError, HandlerResult};
use crate::state::irc_key;

/// Join each listed channel, replying with an error for the ones that fail.
pub(super) fn handle_join(ctx: &mut Context<'_>, channels: Vec<String>) {
    for name in channels {
        if let Err(err) = join_channel(ctx, name) {
            ctx.reply_error(&err, "JOIN");
        }
    }
}

fn join_channel(ctx: &mut Context<'_>, name: String) -> HandlerResult {
    if !is_channel_name(&name) {
        return Err(HandlerError::NoSuchChannel(name));
    }

    let id = ctx.id;
    let Some(prefix) = ctx.client().map(|c| c.prefix()) else {
        return Ok(());
    };

    let channel = ctx.matrix.channels.ensure(&name);
    if !channel.members.insert(id) {
        return Ok(());
    }
    let key = irc_key(&channel.name);
    let display_name = channel.name.clone();

    if let Some(client) = ctx.matrix.client_mut(id) {
        client.channels.insert(key);
    }

    debug!(uid = %id, channel = %display_name, "Joined channel");
    let msg = Message::join(display_name.clone()).with_prefix(prefix);
    ctx.matrix.broadcast(&display_name, &msg);
    Ok(())
}

pub(super) fn handle_part(
    ctx: &mut Context<'_>,
    name: &str,
    reason: Option<String>,
) -> HandlerResult {
    let id = ctx.id;
    let Some(channel) = ctx.matrix.channels().get(name).filter(|c| c.is_member(id)) else {
        return Err(HandlerError::NotOnChannel(name.to_owned()));
    };
    let display_name = channel.name.clone();
    let Some(prefix) = ctx.client().map(|c| c.prefix()) else {
        return Ok(());
    };

    let msg = Message::part(display_name.clone(), reason).with_prefix(prefix);
    ctx.matrix.broadcast(&display_name, &msg);

    ctx.matrix.channels.remove_member(&display_name, id);
    if let Some(client) = ctx.matrix.client_mut(id) {
        client.channels.remove(&irc_key(&display_name));
    }
    debug!(uid = %id, channel = %display_name, "Parted channel");
    Ok(())
}
