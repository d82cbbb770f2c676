//! Error types for the IRC protocol library.
//!
//! This module defines error types for protocol-level errors and
//! message parsing failures.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the IRC command name from raw message bytes (for error reporting).
///
/// This works on the raw bytes so the command can still be named when the
/// rest of the line is not valid UTF-8.
///
/// ```ignore
/// assert_eq!(extract_command_hint(b"PRIVMSG #test hi"), Some("PRIVMSG".to_string()));
/// assert_eq!(extract_command_hint(b":server PRIVMSG #test hi"), Some("PRIVMSG".to_string()));
/// ```
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    // Skip prefix: :server or :nick!user@host (terminated by space)
    if raw_line.first() == Some(&b':') {
        while pos < raw_line.len() && raw_line[pos] != b' ' {
            pos += 1;
        }
        while pos < raw_line.len() && raw_line[pos] == b' ' {
            pos += 1;
        }
    }

    let cmd_start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > cmd_start {
        String::from_utf8(raw_line[cmd_start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Top-level protocol errors.
///
/// Only [`ProtocolError::Io`] is fatal to a connection; every other variant
/// describes a single bad line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in message.
    #[error("invalid UTF-8 in message at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// The raw message line as bytes (before UTF-8 validation failed).
        raw_line: Vec<u8>,
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from UTF-8 decoder.
        details: String,
        /// Command name extracted from the raw line, if any.
        command_hint: Option<String>,
    },

    /// Message exceeded maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual message length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in message.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The invalid message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

impl ProtocolError {
    /// Whether the error ends the connection it occurred on.
    ///
    /// Everything except an I/O failure is scoped to one line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProtocolError::Io(_))
    }
}

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line has no command token.
    #[error("missing command")]
    MissingCommand,

    /// The line started with `:` but nothing followed it.
    #[error("empty prefix")]
    EmptyPrefix,

    /// The `:prefix` segment does not match `nick[!name][@host]`.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// A command with a dedicated argument grammar did not match it.
    #[error("invalid arguments for {command} at position {position}")]
    InvalidArguments {
        /// The command whose arguments failed to parse.
        command: String,
        /// Byte offset into the argument string where parsing stopped.
        position: usize,
    },
}
