//! # Shopify App Installer
//!
//! The backend of a Shopify app: the OAuth installation handshake plus a
//! small discount API, served over HTTP with axum.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`AppConfig`] and [`AppConfigBuilder`]
//! - Validated newtypes for API credentials, hosts, and shop identifiers
//! - The install redirect and OAuth callback via [`auth::oauth::Installer`]
//! - A swappable discount store via [`discounts::DiscountStore`]
//! - The HTTP surface via [`server::router`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_installer::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .scopes("write_discounts".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.redirect_uri(), "https://your-app.com/auth/callback");
//! ```
//!
//! ## Serving
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_installer::auth::oauth::Installer;
//! use shopify_installer::discounts::InMemoryDiscountStore;
//! use shopify_installer::server::{router, AppState};
//!
//! let state = AppState::new(
//!     Arc::new(Installer::new(config)),
//!     Arc::new(InMemoryDiscountStore::new()),
//! );
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router(state)).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: all shared types are `Send + Sync`
//! - **Secrets stay server-side**: keys and tokens are redacted in `Debug`
//!   and never logged

pub mod auth;
pub mod config;
pub mod discounts;
pub mod error;
pub mod server;

// Re-export public types at crate root for convenience
pub use auth::{AuthScopes, InstalledShop, ShopDomain};
pub use config::{ApiKey, ApiSecretKey, AppConfig, AppConfigBuilder, HostUrl, ServerConfig};
pub use error::ConfigError;

// Re-export handshake types for convenience
pub use auth::oauth::{BeginInstallResult, CallbackParams, Installer, OAuthError, StateMode};
