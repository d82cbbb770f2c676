//! PRIVMSG routing.

use microirc_proto::Message;
use tracing::debug;

use super::Context;
use crate::error::HandlerResult;

/// Deliver a PRIVMSG to a channel or a nickname.
///
/// A channel message reaches every other member, and only if the sender is
/// itself a member. Targets that resolve to nothing are dropped silently.
pub(super) fn handle_privmsg(ctx: &mut Context<'_>, target: &str, text: String) -> HandlerResult {
    let id = ctx.id;
    let Some(prefix) = ctx.client().map(|c| c.prefix()) else {
        return Ok(());
    };
    let msg = Message::privmsg(target, text).with_prefix(prefix);

    if target.starts_with('#') {
        let is_member = ctx
            .matrix
            .channels()
            .get(target)
            .is_some_and(|channel| channel.is_member(id));
        if is_member {
            ctx.matrix.route(target, &msg, id);
        } else {
            debug!(uid = %id, recipient = %target, "Dropping PRIVMSG to channel without membership");
        }
    } else if let Some(recipient) = ctx.matrix.find_nick(target) {
        ctx.matrix.send_to(recipient, msg);
    } else {
        debug!(uid = %id, recipient = %target, "Dropping PRIVMSG to unknown nick");
    }
    Ok(())
}
