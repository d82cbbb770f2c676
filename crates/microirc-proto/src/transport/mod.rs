//! IRC transport layer for async I/O.
//!
//! - [`Transport`]: framed TCP transport yielding owned [`Message`] values
//!   - [`Transport::connect`]: outbound connection (the bot)
//!   - [`Transport::tcp`]: wrap an accepted stream (the server)
//! - [`TransportParts`]: independent read and write halves, for callers
//!   that read and write from different branches of a `select!`
//!
//! [`Message`]: crate::Message

mod error;
mod framed;
mod parts;

pub use error::TransportReadError;
pub use framed::Transport;
pub use parts::{TransportParts, TransportReader, TransportWriter};

pub use crate::line::MAX_IRC_LINE_LEN;
