//! Transport error types.

use thiserror::Error;

use crate::error::ProtocolError;

/// Errors that can occur when reading from a transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportReadError {
    /// An I/O error occurred.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single line could not be decoded.
    #[error("transport protocol error: {0}")]
    Protocol(ProtocolError),
}

impl From<ProtocolError> for TransportReadError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(e) => TransportReadError::Io(e),
            other => TransportReadError::Protocol(other),
        }
    }
}

impl TransportReadError {
    /// Whether the connection is unusable after this error.
    ///
    /// Protocol errors cover one line; the next read may succeed.
    pub fn is_fatal(&self) -> bool {
        match self {
            TransportReadError::Io(_) => true,
            TransportReadError::Protocol(e) => e.is_fatal(),
        }
    }
}
