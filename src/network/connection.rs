//! Connection - one task per client socket.
//!
//! The task reads lines and forwards them to the hub in arrival order, and
//! writes whatever the hub queues on the client's SendQ. It owns no server
//! state. When the hub drops the SendQ sender (QUIT, SendQ overflow) the
//! task flushes what is left and closes the socket.

use std::net::SocketAddr;

use anyhow::anyhow;
use microirc_proto::{Message, ProtocolError, Transport, TransportParts, TransportWriter};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::LimitsConfig;
use crate::state::{ClientId, MatrixEvent, MatrixHandle};

/// A client connection handler.
pub struct Connection {
    id: ClientId,
    stream: TcpStream,
    addr: SocketAddr,
    matrix: MatrixHandle,
    limits: LimitsConfig,
}

/// Why the read/write loop stopped.
enum Exit {
    /// The hub already removed the client.
    Released,
    /// The socket ended or failed; the hub must be told.
    Dropped(String),
}

impl Connection {
    pub fn new(
        id: ClientId,
        stream: TcpStream,
        addr: SocketAddr,
        matrix: MatrixHandle,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            id,
            stream,
            addr,
            matrix,
            limits,
        }
    }

    /// Run the connection until either side hangs up.
    #[instrument(skip(self), fields(uid = %self.id, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let id = self.id;
        let (sender, mut outgoing) = mpsc::channel(self.limits.sendq);

        self.matrix
            .send(MatrixEvent::Connect {
                id,
                addr: self.addr,
                sender,
            })
            .await
            .map_err(|_| anyhow!("matrix is not running"))?;

        let TransportParts {
            mut reader,
            mut writer,
        } = Transport::with_max_len(self.stream, self.limits.max_line_len).into_parts();

        let mut malformed: u64 = 0;

        let exit = loop {
            tokio::select! {
                result = reader.read_message() => match result {
                    Ok(Some(message)) => {
                        if self.matrix.send(MatrixEvent::Line { id, message }).await.is_err() {
                            break Exit::Dropped("Server shutting down".to_owned());
                        }
                    }
                    Ok(None) => break Exit::Dropped("Connection closed".to_owned()),
                    Err(e) if !e.is_fatal() => {
                        malformed += 1;
                        warn!(error = %e, "Dropping malformed line");
                    }
                    Err(e) => break Exit::Dropped(format!("Read error: {e}")),
                },

                msg = outgoing.recv() => match msg {
                    Some(msg) => {
                        if let Err(e) = write_batch(&mut writer, &mut outgoing, msg).await {
                            break Exit::Dropped(format!("Write error: {e}"));
                        }
                    }
                    None => break Exit::Released,
                },
            }
        };

        if let Exit::Dropped(reason) = exit {
            info!(%reason, malformed, "Connection dropped");
            // Ignored if the hub is already gone.
            let _ = self
                .matrix
                .send(MatrixEvent::Disconnect { id, reason })
                .await;
        } else {
            debug!(malformed, "Connection released by server");
        }

        if let Err(e) = writer.close().await {
            debug!(error = %e, "Error closing connection");
        }
        Ok(())
    }
}

/// Write `first` and whatever else is already queued, then flush once.
async fn write_batch(
    writer: &mut TransportWriter,
    outgoing: &mut mpsc::Receiver<Message>,
    first: Message,
) -> Result<(), ProtocolError> {
    let mut next = Some(first);
    while let Some(msg) = next {
        debug!(raw = %msg, "Sending message");
        writer.feed_message(msg).await?;
        next = outgoing.try_recv().ok();
    }
    writer.flush().await
}
