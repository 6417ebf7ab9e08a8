//! Tailscale Ephemeral Key Server
//!
//! A single HTTP endpoint that mints short-lived, tagged, ephemeral Tailscale
//! auth keys for clients that must not hold long-lived credentials. The
//! server keeps the OAuth client credentials, exchanges them for an access
//! token on every request, and uses that token to create one key.
//!
//! # Features
//!
//! - **One endpoint**: `POST /api/get-key` returns `{"key": "..."}`
//! - **Fixed key shape**: single-use, ephemeral, not preauthorized, one tag, 5 minute expiry
//! - **Stateless**: no token or key is cached between requests
//! - **Uniform errors**: every failure is a JSON body with status 500
//!
//! # Example
//!
//! ```no_run
//! use tailscale_keygen::config::{Config, Credentials, env};
//! use tailscale_keygen::server::KeyServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(Credentials {
//!         oauth_client_id: std::env::var(env::OAUTH_CLIENT_ID).ok(),
//!         oauth_client_secret: std::env::var(env::OAUTH_CLIENT_SECRET).ok(),
//!         tailnet: std::env::var(env::TAILNET).ok(),
//!         tag: std::env::var(env::TAG).ok(),
//!     });
//!     let server = KeyServer::from_config(&config)?;
//!
//!     server.run_http(([0, 0, 0, 0], 8000).into()).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod issuer;
pub mod models;
pub mod server;

pub use client::{TailscaleApi, TailscaleClient};
pub use config::{Config, Credentials};
pub use error::{ClientError, IssueError};
pub use issuer::KeyIssuer;
