//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket and spawns a Connection task for
//! each incoming client.

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::config::LimitsConfig;
use crate::network::Connection;
use crate::state::MatrixHandle;

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    matrix: MatrixHandle,
    limits: LimitsConfig,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        matrix: MatrixHandle,
        limits: LimitsConfig,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "Listener bound");
        Ok(Self {
            listener,
            matrix,
            limits,
        })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection accepted");

                    let id = self.matrix.next_id();
                    let connection =
                        Connection::new(id, stream, addr, self.matrix.clone(), self.limits.clone());

                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            error!(uid = %id, %addr, error = %e, "Connection error");
                        }
                        info!(uid = %id, %addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
