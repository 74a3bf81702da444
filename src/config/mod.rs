//! Configuration types for the installation service.
//!
//! # Overview
//!
//! - [`AppConfig`]: credentials, scopes, and handshake settings shared by the
//!   install initiator and the callback handler
//! - [`AppConfigBuilder`]: a builder for constructing [`AppConfig`] instances
//! - [`ServerConfig`]: the listen address of the HTTP server
//! - [`ApiKey`], [`ApiSecretKey`], [`HostUrl`]: validated newtypes
//!
//! Configuration is instance-based and passed explicitly; nothing reads the
//! environment after startup.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_API_KEY` - OAuth client id
//! - `SHOPIFY_API_SECRET` - OAuth client secret
//! - `SHOPIFY_HOST_NAME` - Public host of this app (bare host or URL)
//!
//! ## Optional
//! - `SHOPIFY_OLD_API_SECRET` - Previous client secret during key rotation
//! - `SHOPIFY_SCOPES` - Comma-separated scopes (default: `write_discounts`)
//! - `SHOPIFY_STATE_MODE` - `shop` (default) or `nonce`
//! - `SHOPIFY_VERIFY_HMAC` - `true` to require a valid callback HMAC
//! - `SHOPIFY_EXCHANGE_TIMEOUT_SECS` - Token exchange timeout (default: 10)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//!
//! # Example
//!
//! ```rust
//! use shopify_installer::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .host(HostUrl::new("https://myapp.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.redirect_uri(), "https://myapp.example.com/auth/callback");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl};

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::auth::oauth::StateMode;
use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Path of the OAuth callback route, relative to the app host.
pub const DEFAULT_CALLBACK_PATH: &str = "/auth/callback";

/// Paths served by other routes; the callback cannot be mounted on them.
const RESERVED_PATHS: [&str; 3] = ["/", "/auth", "/api/discounts"];

/// Upper bound on the server-to-server token exchange.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifetime of a pending nonce-mode state record.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(600);

/// Configuration for the installation handshake.
///
/// `AppConfig` is `Clone`, `Send`, and `Sync` and is shared by reference
/// with every request handler.
///
/// # Key Rotation
///
/// `old_api_secret_key` is only consulted for callback HMAC validation, so
/// in-flight installs keep working while the client secret is rotated.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: AuthScopes,
    host: HostUrl,
    callback_path: String,
    shop_origin: Option<HostUrl>,
    exchange_timeout: Duration,
    state_mode: StateMode,
    state_ttl: Duration,
    verify_hmac: bool,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any
    /// variable fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar { name })
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder()
            .api_key(ApiKey::new(required("SHOPIFY_API_KEY")?)?)
            .api_secret_key(ApiSecretKey::new(required("SHOPIFY_API_SECRET")?)?)
            .host(HostUrl::new(required("SHOPIFY_HOST_NAME")?)?);

        if let Some(old) = optional("SHOPIFY_OLD_API_SECRET") {
            builder = builder.old_api_secret_key(ApiSecretKey::new(old)?);
        }
        if let Some(scopes) = optional("SHOPIFY_SCOPES") {
            builder = builder.scopes(scopes.parse()?);
        }
        if let Some(mode) = optional("SHOPIFY_STATE_MODE") {
            let mode = mode
                .parse()
                .map_err(|reason| ConfigError::InvalidEnvVar {
                    name: "SHOPIFY_STATE_MODE",
                    reason,
                })?;
            builder = builder.state_mode(mode);
        }
        if let Some(flag) = optional("SHOPIFY_VERIFY_HMAC") {
            builder = builder.verify_hmac(parse_flag("SHOPIFY_VERIFY_HMAC", &flag)?);
        }
        if let Some(secs) = optional("SHOPIFY_EXCHANGE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    name: "SHOPIFY_EXCHANGE_TIMEOUT_SECS",
                    reason: format!("{e}"),
                })?;
            builder = builder.exchange_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the old API secret key, if configured.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the app's public host.
    #[must_use]
    pub const fn host(&self) -> &HostUrl {
        &self.host
    }

    /// Returns the callback path appended to the host.
    #[must_use]
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    /// Returns the full OAuth `redirect_uri`.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        self.host.join(&self.callback_path)
    }

    /// Returns the shop origin override, if configured.
    #[must_use]
    pub const fn shop_origin(&self) -> Option<&HostUrl> {
        self.shop_origin.as_ref()
    }

    /// Returns the token exchange timeout.
    #[must_use]
    pub const fn exchange_timeout(&self) -> Duration {
        self.exchange_timeout
    }

    /// Returns how anti-forgery tokens are produced and checked.
    #[must_use]
    pub const fn state_mode(&self) -> StateMode {
        self.state_mode
    }

    /// Returns the lifetime of pending nonce-mode state records.
    #[must_use]
    pub const fn state_ttl(&self) -> Duration {
        self.state_ttl
    }

    /// Returns whether callbacks must carry a valid HMAC.
    #[must_use]
    pub const fn verify_hmac(&self) -> bool {
        self.verify_hmac
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            name,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Builder for constructing [`AppConfig`] instances.
///
/// Required fields are `api_key`, `api_secret_key`, and `host`.
///
/// # Defaults
///
/// - `scopes`: `write_discounts`
/// - `callback_path`: `/auth/callback`
/// - `shop_origin`: `None` (token calls go to `https://<shop>`)
/// - `exchange_timeout`: 10 seconds
/// - `state_mode`: [`StateMode::ShopEncoded`]
/// - `state_ttl`: 10 minutes
/// - `verify_hmac`: `false`
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    host: Option<HostUrl>,
    callback_path: Option<String>,
    shop_origin: Option<HostUrl>,
    exchange_timeout: Option<Duration>,
    state_mode: Option<StateMode>,
    state_ttl: Option<Duration>,
    verify_hmac: Option<bool>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous API secret key for HMAC validation during rotation.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the app's public host (required).
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the callback path.
    #[must_use]
    pub fn callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = Some(path.into());
        self
    }

    /// Routes server-to-server calls to `origin` instead of `https://<shop>`.
    ///
    /// The shop identifier is still validated and still used for the
    /// authorization URL; only the token endpoint's origin changes.
    #[must_use]
    pub fn shop_origin(mut self, origin: HostUrl) -> Self {
        self.shop_origin = Some(origin);
        self
    }

    /// Sets the token exchange timeout.
    #[must_use]
    pub const fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = Some(timeout);
        self
    }

    /// Sets the anti-forgery token mode.
    #[must_use]
    pub const fn state_mode(mut self, mode: StateMode) -> Self {
        self.state_mode = Some(mode);
        self
    }

    /// Sets the lifetime of pending nonce-mode state records.
    #[must_use]
    pub const fn state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = Some(ttl);
        self
    }

    /// Requires callbacks to carry a valid HMAC signature.
    #[must_use]
    pub const fn verify_hmac(mut self, verify: bool) -> Self {
        self.verify_hmac = Some(verify);
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key`,
    /// `api_secret_key`, or `host` are not set, and
    /// [`ConfigError::InvalidCallbackPath`] if `callback_path` cannot be
    /// mounted as a route.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;
        let host = self
            .host
            .ok_or(ConfigError::MissingRequiredField { field: "host" })?;
        let callback_path = validate_callback_path(
            self.callback_path
                .unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_string()),
        )?;

        Ok(AppConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            host,
            callback_path,
            shop_origin: self.shop_origin,
            exchange_timeout: self.exchange_timeout.unwrap_or(DEFAULT_EXCHANGE_TIMEOUT),
            state_mode: self.state_mode.unwrap_or_default(),
            state_ttl: self.state_ttl.unwrap_or(DEFAULT_STATE_TTL),
            verify_hmac: self.verify_hmac.unwrap_or(false),
        })
    }
}

fn validate_callback_path(path: String) -> Result<String, ConfigError> {
    let mountable = path.starts_with('/')
        && !path.contains(['{', '}', '?', '#', '*'])
        && !path.contains(char::is_whitespace)
        && !RESERVED_PATHS.contains(&path.as_str())
        && !path.starts_with("/api/discounts/");
    if mountable {
        Ok(path)
    } else {
        Err(ConfigError::InvalidCallbackPath { path })
    }
}

/// Listen address of the HTTP server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address to bind to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST` and `PORT` from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if either value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads `HOST` and `PORT` from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            config.host = host.trim().parse().map_err(|e| ConfigError::InvalidEnvVar {
                name: "HOST",
                reason: format!("{e}"),
            })?;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|e| ConfigError::InvalidEnvVar {
                name: "PORT",
                reason: format!("{e}"),
            })?;
        }
        Ok(config)
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn required_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SHOPIFY_API_KEY", "key"),
            ("SHOPIFY_API_SECRET", "secret"),
            ("SHOPIFY_HOST_NAME", "myapp.example.com"),
        ]
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = AppConfigBuilder::new()
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_requires_host() {
        let result = AppConfigBuilder::new()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "host" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.scopes().to_string(), "write_discounts");
        assert_eq!(config.callback_path(), "/auth/callback");
        assert_eq!(config.exchange_timeout(), Duration::from_secs(10));
        assert_eq!(config.state_mode(), StateMode::ShopEncoded);
        assert!(!config.verify_hmac());
        assert!(config.shop_origin().is_none());
        assert!(config.old_api_secret_key().is_none());
    }

    #[test]
    fn test_builder_accepts_custom_callback_path() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .callback_path("/oauth/done")
            .build()
            .unwrap();

        assert_eq!(config.callback_path(), "/oauth/done");
        assert_eq!(config.redirect_uri(), "https://myapp.example.com/oauth/done");
    }

    #[test]
    fn test_builder_rejects_unmountable_callback_path() {
        for path in ["", "oauth/done", "/", "/auth", "/api/discounts", "/api/discounts/x", "/cb/{id}", "/a b"] {
            let result = AppConfig::builder()
                .api_key(ApiKey::new("key").unwrap())
                .api_secret_key(ApiSecretKey::new("secret").unwrap())
                .host(HostUrl::new("https://myapp.example.com").unwrap())
                .callback_path(path)
                .build();

            assert!(
                matches!(result, Err(ConfigError::InvalidCallbackPath { .. })),
                "{path}"
            );
        }
    }

    #[test]
    fn test_config_debug_does_not_leak_secret() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_secret_key(ApiSecretKey::new("very-secret-value").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("AppConfig"));
        assert!(!debug_str.contains("very-secret-value"));
    }

    #[test]
    fn test_from_lookup_reads_required_variables() {
        let config = AppConfig::from_lookup(lookup_from(&required_vars())).unwrap();

        assert_eq!(config.api_key().as_ref(), "key");
        assert_eq!(config.api_secret_key().as_ref(), "secret");
        assert_eq!(
            config.redirect_uri(),
            "https://myapp.example.com/auth/callback"
        );
    }

    #[test]
    fn test_from_lookup_reports_missing_variable() {
        let result = AppConfig::from_lookup(lookup_from(&[("SHOPIFY_API_KEY", "key")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingEnvVar {
                name: "SHOPIFY_API_SECRET"
            }
        );
    }

    #[test]
    fn test_from_lookup_reads_optional_variables() {
        let mut vars = required_vars();
        vars.extend([
            ("SHOPIFY_SCOPES", "write_discounts,read_products"),
            ("SHOPIFY_STATE_MODE", "nonce"),
            ("SHOPIFY_VERIFY_HMAC", "true"),
            ("SHOPIFY_EXCHANGE_TIMEOUT_SECS", "3"),
            ("SHOPIFY_OLD_API_SECRET", "old-secret"),
        ]);

        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();

        assert!(config.scopes().contains("read_products"));
        assert_eq!(config.state_mode(), StateMode::Nonce);
        assert!(config.verify_hmac());
        assert_eq!(config.exchange_timeout(), Duration::from_secs(3));
        assert_eq!(
            config.old_api_secret_key().map(AsRef::as_ref),
            Some("old-secret")
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_flag() {
        let mut vars = required_vars();
        vars.push(("SHOPIFY_VERIFY_HMAC", "maybe"));

        let result = AppConfig::from_lookup(lookup_from(&vars));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar {
                name: "SHOPIFY_VERIFY_HMAC",
                ..
            })
        ));
    }

    #[test]
    fn test_server_config_defaults_and_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");

        let config =
            ServerConfig::from_lookup(lookup_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]))
                .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");

        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { name: "PORT", .. })
        ));
    }
}
