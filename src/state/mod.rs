//! State management module.
//!
//! Contains the Matrix (the hub that owns all server state) and the
//! entities it manages.

mod channel;
mod client;
mod matrix;
mod uid;

pub use channel::{irc_key, Channel, ChannelRegistry};
pub use client::{Client, Delivery, RegistrationState, PLACEHOLDER_USERNAME};
pub use matrix::{Matrix, MatrixEvent, MatrixHandle, ServerInfo, SENDQ_EXCEEDED};
pub use uid::{ClientId, UidGenerator};
