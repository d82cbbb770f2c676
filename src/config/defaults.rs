//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::{Ipv6Addr, SocketAddr};

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "irc.microircd.local".to_string()
}

pub fn default_network() -> String {
    "MicroNet".to_string()
}

pub fn default_version() -> String {
    concat!("microircd-", env!("CARGO_PKG_VERSION")).to_string()
}

// =============================================================================
// Listen Defaults
// =============================================================================

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv6Addr::LOCALHOST, 6667))
}

// =============================================================================
// Limit Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    microirc_proto::MAX_IRC_LINE_LEN
}

pub fn default_sendq() -> usize {
    256
}

pub fn default_event_queue() -> usize {
    1024
}
