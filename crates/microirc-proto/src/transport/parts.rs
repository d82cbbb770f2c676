//! Transport parts for splitting read/write halves.

use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

use super::error::TransportReadError;
use super::framed::read_next;

/// The two halves produced by [`super::Transport::into_parts`].
pub struct TransportParts {
    /// Message reader over the read half.
    pub reader: TransportReader,
    /// Message writer over the write half.
    pub writer: TransportWriter,
}

/// Owned read half of a transport.
pub struct TransportReader {
    framed: FramedRead<OwnedReadHalf, IrcCodec>,
}

impl TransportReader {
    pub(super) fn new(framed: FramedRead<OwnedReadHalf, IrcCodec>) -> Self {
        Self { framed }
    }

    /// Read the next message; see [`super::Transport::read_message`].
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` branch.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        read_next(self.framed.next().await)
    }
}

/// Owned write half of a transport.
pub struct TransportWriter {
    framed: FramedWrite<OwnedWriteHalf, IrcCodec>,
}

impl TransportWriter {
    pub(super) fn new(framed: FramedWrite<OwnedWriteHalf, IrcCodec>) -> Self {
        Self { framed }
    }

    /// Queue a message without flushing. Follow with [`Self::flush`].
    pub async fn feed_message(&mut self, message: Message) -> Result<(), ProtocolError> {
        self.framed.feed(message).await
    }

    /// Flush queued messages.
    pub async fn flush(&mut self) -> Result<(), ProtocolError> {
        self.framed.flush().await
    }

    /// Flush pending output and shut down the write side.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.framed.close().await
    }
}
