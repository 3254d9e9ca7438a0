use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use huddle::model::IceServerConfig;
use huddle::server::{AllowedOrigin, ServerConfig, SignalingServer};
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset. Covers the server library and this binary.
const DEFAULT_LOG_FILTER: &str = "huddle_server=info,huddle_signal=info";

#[derive(Parser, Debug)]
#[command(name = "huddle-signal")]
#[command(about = "Room discovery and offer/answer/ICE relay for browser video calls")]
struct Args {
    /// Interface to listen on
    #[arg(long, env = "SOCKET_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(short, long, env = "SOCKET_PORT", default_value_t = 5001)]
    port: u16,

    /// Browser origin allowed to connect, or `*`
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    allowed_origin: AllowedOrigin,

    /// STUN/TURN url announced to clients; repeatable
    #[arg(long = "ice-server", env = "ICE_SERVERS", value_delimiter = ',')]
    ice_servers: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    tracing::debug!(?args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let addr = SocketAddr::new(args.host, args.port);
    let config = args
        .ice_servers
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .fold(
            ServerConfig::with_addr(addr).allowed_origin(args.allowed_origin),
            |config, url| config.ice_server(IceServerConfig::new(url)),
        );

    println!("{}", "📡 Starting huddle signaling hub...".green().bold());

    let server = SignalingServer::bind(config)
        .await
        .context("Cannot start signaling server")?;
    let local = server.local_addr()?;

    println!("   🔌 WebSocket: ws://{}/ws", local);
    println!("   🩺 Health:    http://{}/health", local);

    server.run().await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
