//! Spindex - Spotify library CLI
//!
//! This library authenticates against Spotify with the OAuth2
//! authorization-code + PKCE flow, keeps a single reusable access
//! credential in process memory with expiry-aware refresh, and exposes a
//! paginated Web API client for browsing playlists and liked songs.
//!
//! # Architecture
//!
//! - `auth`: PKCE generation, the loopback callback listener, token
//!   exchange/refresh, and the token cache + lifecycle manager
//! - `spotify`: Web API models and the paginated client
//! - `commands`: CLI subcommand handlers
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use spindex::auth::session::{AuthParams, Authenticator};
//! use spindex::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let auth = Authenticator::new(
//!         AuthParams::from_config(&config),
//!         Arc::new(reqwest::Client::new()),
//!     );
//!     let creds = auth.login().await?;
//!     println!("access token: {}", creds.access_token);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod spotify;

// Re-export commonly used types
pub use auth::session::{AuthParams, Authenticator};
pub use auth::token::Credentials;
pub use config::Config;
pub use error::{Result, SpindexError};
pub use spotify::client::SpotifyClient;
