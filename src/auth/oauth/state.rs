//! Anti-forgery state parameter handling.
//!
//! The `state` query parameter travels from the install redirect through the
//! platform's consent screen and back to the callback, where it is checked
//! against the callback's `shop`. Two modes are supported, selected with
//! [`StateMode`]:
//!
//! - **Shop-encoded** ([`StateMode::ShopEncoded`], the default): the state is
//!   the standard base64 encoding of the shop identifier. No server-side
//!   record is kept. Anyone who knows a shop identifier can compute its
//!   state, so this mode only correlates a callback with a shop; it does not
//!   prove this server started the flow.
//! - **Nonce** ([`StateMode::Nonce`]): the state is a random 15-character
//!   alphanumeric nonce bound to the shop in a short-lived, single-use
//!   record (see [`StateStore`](super::StateStore)).
//!
//! # Example
//!
//! ```rust
//! use shopify_installer::ShopDomain;
//! use shopify_installer::auth::oauth::StateParam;
//!
//! let shop = ShopDomain::parse("foo.myshopify.com").unwrap();
//! let state = StateParam::for_shop(&shop);
//! assert_eq!(state.as_ref(), "Zm9vLm15c2hvcGlmeS5jb20=");
//! assert_eq!(state.decode_shop().as_deref(), Some("foo.myshopify.com"));
//!
//! let nonce = StateParam::nonce();
//! assert_eq!(nonce.as_ref().len(), 15);
//! ```

use crate::auth::ShopDomain;
use base64::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// How anti-forgery tokens are produced and verified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateMode {
    /// State is `base64(shop)`; verification decodes and compares.
    #[default]
    ShopEncoded,
    /// State is a random nonce recorded server-side and consumed once.
    Nonce,
}

impl FromStr for StateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shop" | "shop_encoded" | "encoded" => Ok(Self::ShopEncoded),
            "nonce" => Ok(Self::Nonce),
            other => Err(format!("expected 'shop' or 'nonce', got '{other}'")),
        }
    }
}

/// An OAuth `state` value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateParam(String);

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Length of generated nonces.
    pub const NONCE_LENGTH: usize = 15;

    /// Derives the state for `shop` by base64-encoding it.
    #[must_use]
    pub fn for_shop(shop: &ShopDomain) -> Self {
        Self(BASE64_STANDARD.encode(shop.as_ref().as_bytes()))
    }

    /// Generates a random alphanumeric nonce from a cryptographically
    /// secure RNG.
    #[must_use]
    pub fn nonce() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();
        Self(nonce)
    }

    /// Wraps a state received from a callback.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Decodes a shop-encoded state back into the identifier it was made
    /// from. Returns `None` if the value is not valid base64 of UTF-8 text.
    #[must_use]
    pub fn decode_shop(&self) -> Option<String> {
        let decoded = BASE64_STANDARD.decode(self.0.as_bytes()).ok()?;
        String::from_utf8(decoded).ok()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
