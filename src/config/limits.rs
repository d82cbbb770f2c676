//! Line length and queue size limits.

use serde::Deserialize;

use super::defaults::{default_event_queue, default_max_line_len, default_sendq};

/// Line length and queue size limits.
///
/// `sendq` bounds each client's outbound queue in messages; a client whose
/// queue is full when the hub delivers to it is disconnected.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum inbound line length in bytes, CRLF included (default: 512).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Per-client outbound queue capacity in messages (default: 256).
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Hub mailbox capacity shared by all connections (default: 1024).
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            sendq: default_sendq(),
            event_queue: default_event_queue(),
        }
    }
}
