//! OAuth installation handshake for the app.
//!
//! An [`Installer`] runs both halves of the authorization code grant:
//!
//! 1. **Install initiation** ([`Installer::begin_install`]): validate the shop
//!    and build the redirect to the platform's consent screen, carrying an
//!    anti-forgery `state`.
//!
//! 2. **Callback handling** ([`Installer::complete_install`]): validate the
//!    callback's parameters and `state`, then exchange the one-time code for
//!    an access token with a single server-to-server POST.
//!
//! # Anti-forgery Modes
//!
//! [`StateMode::ShopEncoded`] (default) derives the state from the shop and
//! keeps no server-side record. [`StateMode::Nonce`] issues a random nonce
//! bound to the shop in a single-use, short-lived [`StateStore`] record.
//!
//! # Security Features
//!
//! - **Shop validation**: only `*.myshopify.com` hosts receive redirects or
//!   token requests
//! - **HMAC validation**: optional verification of the callback signature,
//!   with old-secret fallback during key rotation
//! - **Constant-time comparison** for state and signature checks
//! - **Bounded exchange**: the token call has a configurable timeout
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_installer::AppConfig;
//! use shopify_installer::auth::oauth::{CallbackParams, Installer};
//!
//! let installer = Installer::new(AppConfig::from_env()?);
//!
//! // GET /auth?shop=...
//! let begin = installer.begin_install(Some("my-store.myshopify.com")).await?;
//! // Redirect to begin.auth_url
//!
//! // GET /auth/callback?code=...&shop=...&state=...
//! let installed = installer.complete_install(&params).await?;
//! println!("Installed on {}", installed.shop);
//! ```

mod begin_install;
mod callback_params;
mod complete_install;
mod error;
pub mod hmac;
mod installer;
mod state;
mod state_store;

pub use begin_install::BeginInstallResult;
pub use callback_params::CallbackParams;
pub use complete_install::InstallPhase;
pub use error::OAuthError;
pub use installer::Installer;
pub use state::{StateMode, StateParam};
pub use state_store::StateStore;
