//! microircd - a minimal IRC server and bot.
//!
//! The server side is a single-owner hub ([`state::Matrix`]) fed by one
//! task per connection ([`network`]). The bot side ([`bot`]) is a small
//! client session that registers, joins one channel and answers pings.
//! Line parsing and framing live in the `microirc-proto` crate.

pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
