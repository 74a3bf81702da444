//! The installation handshake service.

use crate::auth::oauth::StateStore;
use crate::config::AppConfig;

/// Runs the install initiator and callback handler for one app.
///
/// An `Installer` owns its configuration, one pooled HTTP client for token
/// exchanges, and (in nonce mode) the pending state records. Requests share
/// it by reference; each install flow is otherwise independent.
///
/// See [`Installer::begin_install`] and [`Installer::complete_install`].
#[derive(Clone, Debug)]
pub struct Installer {
    pub(super) config: AppConfig,
    pub(super) http: reqwest::Client,
    pub(super) states: StateStore,
}

impl Installer {
    /// Creates an installer for `config`.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Creates an installer that sends token exchanges through `http`.
    #[must_use]
    pub fn with_http_client(config: AppConfig, http: reqwest::Client) -> Self {
        let states = StateStore::new(config.state_ttl());
        Self {
            config,
            http,
            states,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }
}

// Verify Installer is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Installer>();
};
