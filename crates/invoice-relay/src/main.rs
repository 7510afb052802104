//! Invoice Relay - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use invoice_relay::{config::Config, server::RelayServer};

#[derive(Parser, Debug)]
#[command(name = "invoice-relay")]
#[command(about = "OAuth2 authorization-code relay for QuickBooks Online invoices")]
#[command(version)]
struct Cli {
    /// HTTP server port (overrides the PORT environment variable)
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        port = config.port,
        "Starting invoice relay"
    );

    RelayServer::new(config)?.run_http().await
}
