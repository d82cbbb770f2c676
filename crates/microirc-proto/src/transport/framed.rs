//! Framed IRC transport over TCP.

use std::io;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, FramedRead, FramedWrite};
use tracing::warn;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

use super::error::TransportReadError;
use super::parts::{TransportParts, TransportReader, TransportWriter};
use super::MAX_IRC_LINE_LEN;

/// IRC transport over a TCP stream.
pub struct Transport {
    framed: Framed<TcpStream, IrcCodec>,
    max_len: usize,
}

impl Transport {
    /// Open a TCP connection to `addr` and wrap it.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::tcp(stream))
    }

    /// Create a new TCP transport from a connected stream.
    pub fn tcp(stream: TcpStream) -> Self {
        Self::with_max_len(stream, MAX_IRC_LINE_LEN)
    }

    /// Create a TCP transport with a custom maximum line length.
    pub fn with_max_len(stream: TcpStream, max_len: usize) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self {
            framed: Framed::new(stream, IrcCodec::with_max_len(max_len)),
            max_len,
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    /// Read the next IRC message from the transport.
    ///
    /// Returns `Ok(None)` when the connection is closed. A line that fails
    /// to decode is returned as a non-fatal [`TransportReadError::Protocol`];
    /// reading may continue afterwards.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        read_next(self.framed.next().await)
    }

    /// Write an IRC message to the transport.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), ProtocolError> {
        self.framed.send(message.clone()).await
    }

    /// Flush pending output and shut down the write side.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.framed.close().await
    }

    /// Split into independent read and write halves.
    ///
    /// Bytes already buffered by the reader are carried over.
    pub fn into_parts(self) -> TransportParts {
        let parts = self.framed.into_parts();
        let (read_half, write_half) = parts.io.into_split();

        let mut reader = FramedRead::new(read_half, parts.codec);
        *reader.read_buffer_mut() = parts.read_buf;

        let mut writer = FramedWrite::new(write_half, IrcCodec::with_max_len(self.max_len));
        *writer.write_buffer_mut() = parts.write_buf;

        TransportParts {
            reader: TransportReader::new(reader),
            writer: TransportWriter::new(writer),
        }
    }
}

/// Flatten one item of an [`IrcCodec`] stream.
pub(super) fn read_next(
    item: Option<Result<Result<Message, ProtocolError>, ProtocolError>>,
) -> Result<Option<Message>, TransportReadError> {
    match item {
        Some(Ok(Ok(msg))) => Ok(Some(msg)),
        Some(Ok(Err(e))) | Some(Err(e)) => Err(TransportReadError::from(e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_read_skips_bad_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(b":\r\n\r\nPING :abc\r\n")
                .await
                .unwrap();
        });

        let (stream, _) = listener.accept().await.unwrap();
        let mut transport = Transport::tcp(stream);

        let err = transport.read_message().await.unwrap_err();
        assert!(!err.is_fatal());

        let msg = transport.read_message().await.unwrap().unwrap();
        assert_eq!(msg, Message::ping("abc"));

        client.await.unwrap();
        assert!(transport.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_appends_crlf() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let writer = tokio::spawn(async move {
            let mut transport = Transport::connect(addr).await.unwrap();
            transport.write_message(&Message::nick("bot")).await.unwrap();
            transport.close().await.unwrap();
        });

        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).await.unwrap();
        writer.await.unwrap();

        assert_eq!(received, "NICK bot\r\n");
    }
}
