//! # microirc-proto
//!
//! Parsing, serialization and framing of IRC protocol lines for the
//! `microircd` server and `microbot` client.
//!
//! ## Features
//!
//! - Line parsing into [`Message`] with optional [`Prefix`]
//! - Dedicated grammar for the `352` WHOREPLY numeric
//! - Byte-faithful re-serialization through `Display`
//! - Optional Tokio integration: line and message codecs, TCP [`Transport`]

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use microirc_proto::{Message, Prefix};
//!
//! let msg: Message = ":nick!user@host PRIVMSG #rust :Hello, world!".parse().unwrap();
//! assert_eq!(msg.prefix, Some(Prefix::new("nick", "user", "host")));
//! assert_eq!(msg.args, ["#rust", "Hello, world!"]);
//! assert_eq!(msg.to_string(), ":nick!user@host PRIVMSG #rust :Hello, world!");
//!
//! let who: Message = ":srv 352 me #rust u h s nick H :0 Real Name".parse().unwrap();
//! assert_eq!(who.args.len(), 11);
//! ```

pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;
pub mod util;

pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::{Message, WhoReply};
pub use self::prefix::Prefix;
pub use self::response::Response;

#[cfg(feature = "tokio")]
pub mod transport;
#[cfg(feature = "tokio")]
pub use self::transport::{
    Transport, TransportParts, TransportReadError, TransportReader, TransportWriter,
    MAX_IRC_LINE_LEN,
};
