//! Client identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle for one connected client.
///
/// Displays as six base36 characters, e.g. `AAAAAC`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

impl ClientId {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base36_encode_6(self.0))
    }
}

/// Generates unique client ids.
///
/// Shared by every connection task; ids are never reused within a process.
#[derive(Debug, Default)]
pub struct UidGenerator {
    counter: AtomicU64,
}

impl UidGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next unique id.
    pub fn next(&self) -> ClientId {
        ClientId(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

/// Encode a number as a 6-character base36 string.
fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for i in (0..6).rev() {
        result[i] = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}
