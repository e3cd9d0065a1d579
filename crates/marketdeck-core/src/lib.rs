//! Core library for MarketDeck.
//!
//! An authenticated HTTP client for the campaign, agent and analytics
//! services behind the MarketDeck dashboard, with structured request logging
//! and session-expiry handling.
//!
//! ```no_run
//! use std::sync::Arc;
//! use marketdeck_core::{ApiClient, Config, FileSessionStore, NoopNavigator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let session = Arc::new(FileSessionStore::new(config.cache_dir()?));
//! let client = ApiClient::new(config.origins(), session, Arc::new(NoopNavigator))?;
//! let campaigns = client.list_campaigns().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, Navigator, NoopNavigator,
    SessionStore, LOGIN_ROUTE,
};
pub use config::{Config, ServiceOrigins, TokenStorage};
