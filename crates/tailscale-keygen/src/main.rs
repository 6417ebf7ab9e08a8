//! Tailscale Ephemeral Key Server - Entry Point

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tailscale_keygen::config::{Config, Credentials, api, env};
use tailscale_keygen::server::KeyServer;

#[derive(Parser, Debug)]
#[command(name = "tailscale-keygen")]
#[command(about = "Mint short-lived ephemeral Tailscale auth keys over HTTP")]
#[command(version)]
struct Cli {
    /// OAuth client ID with the auth_keys scope
    #[arg(long, env = env::OAUTH_CLIENT_ID, hide_env_values = true)]
    oauth_client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = env::OAUTH_CLIENT_SECRET, hide_env_values = true)]
    oauth_client_secret: Option<String>,

    /// Tailnet to create keys in (e.g. example.com, or "-" for the client's default)
    #[arg(long, env = env::TAILNET)]
    tailnet: Option<String>,

    /// Tag applied to devices that join with an issued key (e.g. tag:ci)
    #[arg(long, env = env::TAG)]
    tag: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: IpAddr,

    /// HTTP server port
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Tailscale API base URL
    #[arg(long, default_value = api::BASE_URL, env = env::API_BASE_URL)]
    api_base_url: String,

    /// Timeout for each outbound Tailscale API call, in seconds
    #[arg(long, default_value = "10", env = env::REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    /// Connect timeout for outbound calls, in seconds
    #[arg(long, default_value = "5", env = env::CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Include diagnostic details in error responses
    #[arg(long, env = env::EXPOSE_ERROR_DETAILS)]
    expose_error_details: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let credentials = Credentials {
            oauth_client_id: self.oauth_client_id.clone(),
            oauth_client_secret: self.oauth_client_secret.clone(),
            tailnet: self.tailnet.clone(),
            tag: self.tag.clone(),
        };

        Config {
            api_base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            expose_error_details: self.expose_error_details,
            ..Config::new(credentials)
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

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

    let config = cli.config();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_base_url = %config.api_base_url,
        credentials = ?config.credentials,
        expose_error_details = config.expose_error_details,
        "Starting Tailscale key server"
    );

    let server = KeyServer::from_config(&config)?;
    server.run_http(SocketAddr::new(cli.host, cli.port)).await
}
