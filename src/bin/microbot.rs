//! microbot - joins a channel on an IRC server and answers pings.
//!
//! # Usage
//!
//! ```bash
//! microbot --host ::1 --port 6667 --name microbot --channel test --debug
//! ```

use anyhow::Context;
use clap::Parser;
use microirc_proto::Transport;
use microircd::bot::Bot;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A minimal IRC bot
#[derive(Parser, Debug)]
#[command(name = "microbot")]
#[command(about = "Minimal IRC bot that joins a single channel")]
#[command(version)]
struct Args {
    /// Server to connect to
    #[arg(long, default_value = "::1")]
    host: String,

    /// Port to use
    #[arg(long, default_value_t = 6667)]
    port: u16,

    /// Name of the bot
    #[arg(long, default_value = "microbot")]
    name: String,

    /// Channel to join, without the leading #
    #[arg(long, default_value = "test")]
    channel: String,

    /// Log every line sent and received
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    info!(
        host = %args.host,
        port = args.port,
        name = %args.name,
        channel = %args.channel,
        "Starting microbot"
    );

    let transport = Transport::connect((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", args.host, args.port))?;

    let mut bot = Bot::new(args.name, args.channel);
    bot.run(transport, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}
