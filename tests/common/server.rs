//! Test server management.
//!
//! Runs a microircd hub and gateway inside the test runtime, listening on
//! an ephemeral loopback port.

use microircd::config::{LimitsConfig, ServerConfig};
use microircd::network::Gateway;
use microircd::state::{Matrix, ServerInfo};
use std::net::SocketAddr;
use tokio::task::JoinHandle;

use super::TestClient;

/// Server name every test server uses.
#[allow(dead_code)]
pub const SERVER_NAME: &str = "test.server";

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    gateway: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Spawn a new test server with default limits.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_limits(LimitsConfig::default()).await
    }

    /// Spawn a new test server with the given limits.
    pub async fn spawn_with_limits(limits: LimitsConfig) -> anyhow::Result<Self> {
        let server = ServerConfig {
            name: SERVER_NAME.to_string(),
            network: "TestNet".to_string(),
            ..ServerConfig::default()
        };

        let (handle, _matrix) = Matrix::new(ServerInfo::from_config(&server)).spawn(limits.event_queue);
        let gateway = Gateway::bind("127.0.0.1:0".parse()?, handle, limits).await?;
        let addr = gateway.local_addr()?;

        Ok(Self {
            addr,
            gateway: tokio::spawn(gateway.run()),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Connect a new client.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<TestClient> {
        TestClient::connect(&self.address(), nick).await
    }

    /// Connect and register a new client.
    #[allow(dead_code)]
    pub async fn connect_registered(&self, nick: &str) -> anyhow::Result<TestClient> {
        let mut client = self.connect(nick).await?;
        client.register().await?;
        Ok(client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.gateway.abort();
    }
}
