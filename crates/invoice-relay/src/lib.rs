//! Invoice Relay
//!
//! A minimal OAuth2 authorization-code relay for QuickBooks Online. A
//! browser user authenticates against the provider, the relay exchanges the
//! authorization code for tokens, keeps them in a server-side session, and
//! proxies read-only invoice queries back to the caller.
//!
//! # Features
//!
//! - **Authorization-code flow**: initiate, CSRF-checked callback, exchange
//! - **Session-backed tokens**: signed cookie, injectable server-side store
//! - **Invoice proxy**: full collection, single lookup by document number,
//!   HTML table view
//!
//! # Example
//!
//! ```no_run
//! use invoice_relay::{config::Config, server::RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     RelayServer::new(config)?.run_http().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod server;
pub mod session;

pub use config::Config;
pub use error::{ProviderError, RelayError};
pub use provider::QuickBooksClient;
