//! Result of a completed installation.

use crate::auth::ShopDomain;
use serde::Deserialize;
use std::fmt;

/// Response body of the platform's token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The access token for the shop's Admin API.
    pub access_token: String,

    /// Comma-separated scopes actually granted, when reported.
    #[serde(default)]
    pub scope: Option<String>,
}

/// A shop that finished the OAuth handshake.
///
/// Holds the access token only for the lifetime of the callback request;
/// the service does not persist it. `Debug` redacts the token.
#[derive(Clone, PartialEq, Eq)]
pub struct InstalledShop {
    /// The installing shop.
    pub shop: ShopDomain,
    /// The access token obtained from the exchange.
    pub access_token: String,
    /// Scopes granted, when the platform reported them.
    pub scope: Option<String>,
}

impl InstalledShop {
    /// Builds the result from a token endpoint response.
    #[must_use]
    pub fn from_access_token_response(shop: ShopDomain, response: AccessTokenResponse) -> Self {
        Self {
            shop,
            access_token: response.access_token,
            scope: response.scope,
        }
    }
}

impl fmt::Debug for InstalledShop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstalledShop")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

// Verify InstalledShop is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InstalledShop>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_with_and_without_scope() {
        let full: AccessTokenResponse =
            serde_json::from_str(r#"{"access_token":"tok_1","scope":"write_discounts"}"#).unwrap();
        assert_eq!(full.access_token, "tok_1");
        assert_eq!(full.scope.as_deref(), Some("write_discounts"));

        let bare: AccessTokenResponse = serde_json::from_str(r#"{"access_token":"tok_2"}"#).unwrap();
        assert!(bare.scope.is_none());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let installed = InstalledShop::from_access_token_response(
            ShopDomain::parse("foo.myshopify.com").unwrap(),
            AccessTokenResponse {
                access_token: "shpat_secret".to_string(),
                scope: None,
            },
        );
        let debug = format!("{installed:?}");
        assert!(debug.contains("foo.myshopify.com"));
        assert!(!debug.contains("shpat_secret"));
    }
}
