//! Authorization URL generation.
//!
//! [`Installer::begin_install`] is the first step of the installation
//! handshake. It validates the shop identifier, derives the anti-forgery
//! state, and builds the platform's authorization URL. The caller is
//! responsible for issuing the HTTP redirect.
//!
//! # Example
//!
//! ```rust
//! # block_on(async {
//! use shopify_installer::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//! use shopify_installer::auth::oauth::Installer;
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("secret").unwrap())
//!     .host(HostUrl::new("https://myapp.example.com").unwrap())
//!     .build()
//!     .unwrap();
//! let installer = Installer::new(config);
//!
//! let result = installer.begin_install(Some("foo.myshopify.com")).await.unwrap();
//! assert!(result.auth_url.starts_with("https://foo.myshopify.com/admin/oauth/authorize?"));
//! assert_eq!(result.state.decode_shop().as_deref(), Some("foo.myshopify.com"));
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use crate::auth::oauth::{Installer, OAuthError, StateMode, StateParam};
use crate::auth::ShopDomain;

/// Result of initiating an installation.
#[derive(Clone, Debug)]
pub struct BeginInstallResult {
    /// The validated shop.
    pub shop: ShopDomain,

    /// The full authorization URL to redirect the merchant to.
    pub auth_url: String,

    /// The state embedded in `auth_url`.
    pub state: StateParam,
}

// Verify BeginInstallResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginInstallResult>();
};

impl Installer {
    /// Starts an installation for `shop`.
    ///
    /// In [`StateMode::ShopEncoded`] nothing is stored; in
    /// [`StateMode::Nonce`] the nonce is recorded for the callback to
    /// consume.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MissingShop`] if `shop` is `None` or empty
    /// - [`OAuthError::InvalidShopFormat`] if `shop` is not `name.myshopify.com`
    pub async fn begin_install(&self, shop: Option<&str>) -> Result<BeginInstallResult, OAuthError> {
        let shop = match shop {
            Some(shop) if !shop.is_empty() => shop,
            _ => {
                tracing::warn!("Install request without shop parameter");
                return Err(OAuthError::MissingShop);
            }
        };

        let shop = ShopDomain::parse(shop).inspect_err(|_| {
            tracing::warn!(shop, "Install request with invalid shop format");
        })?;

        let state = match self.config.state_mode() {
            StateMode::ShopEncoded => StateParam::for_shop(&shop),
            StateMode::Nonce => {
                let state = StateParam::nonce();
                self.states.issue(&state, &shop).await;
                state
            }
        };

        let auth_url = self.authorization_url(&shop, &state);
        tracing::info!(shop = %shop, "Starting installation");
        tracing::debug!(%auth_url, "Generated authorization URL");

        Ok(BeginInstallResult {
            shop,
            auth_url,
            state,
        })
    }

    fn authorization_url(&self, shop: &ShopDomain, state: &StateParam) -> String {
        let params = [
            ("client_id", self.config.api_key().as_ref().to_string()),
            ("scope", self.config.scopes().to_string()),
            ("redirect_uri", self.config.redirect_uri()),
            ("state", state.to_string()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "https://{}/admin/oauth/authorize?{}",
            shop.as_ref(),
            query_string
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, AppConfig, HostUrl};

    fn create_installer(mode: StateMode) -> Installer {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .state_mode(mode)
            .build()
            .unwrap();
        Installer::new(config)
    }

    /// Extracts and percent-decodes a query parameter from `url`.
    fn query_param(url: &str, key: &str) -> Option<String> {
        let (_, query) = url.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| urlencoding::decode(v).unwrap().into_owned())
        })
    }

    #[tokio::test]
    async fn test_begin_install_generates_correct_url_structure() {
        let installer = create_installer(StateMode::ShopEncoded);

        let result = installer
            .begin_install(Some("test-shop.myshopify.com"))
            .await
            .unwrap();

        assert!(result
            .auth_url
            .starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
        assert_eq!(
            query_param(&result.auth_url, "client_id").as_deref(),
            Some("test-api-key")
        );
        assert_eq!(
            query_param(&result.auth_url, "scope").as_deref(),
            Some("write_discounts")
        );
        assert_eq!(
            query_param(&result.auth_url, "redirect_uri").as_deref(),
            Some("https://myapp.example.com/auth/callback")
        );
    }

    #[tokio::test]
    async fn test_state_in_url_decodes_to_shop() {
        let installer = create_installer(StateMode::ShopEncoded);

        for shop in ["foo.myshopify.com", "My-Store-9.myshopify.com"] {
            let result = installer.begin_install(Some(shop)).await.unwrap();
            let state = query_param(&result.auth_url, "state").unwrap();

            assert_eq!(state, result.state.as_ref());
            assert_eq!(
                StateParam::from_raw(state).decode_shop().as_deref(),
                Some(shop)
            );
        }
    }

    #[tokio::test]
    async fn test_begin_install_requires_shop() {
        let installer = create_installer(StateMode::ShopEncoded);

        assert_eq!(
            installer.begin_install(None).await.unwrap_err(),
            OAuthError::MissingShop
        );
        assert_eq!(
            installer.begin_install(Some("")).await.unwrap_err(),
            OAuthError::MissingShop
        );
    }

    #[tokio::test]
    async fn test_begin_install_rejects_invalid_shop() {
        let installer = create_installer(StateMode::ShopEncoded);

        for shop in ["foo", "foo.example.com", "-foo.myshopify.com", "a/b.myshopify.com"] {
            assert!(matches!(
                installer.begin_install(Some(shop)).await,
                Err(OAuthError::InvalidShopFormat { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_nonce_mode_records_state_for_shop() {
        let installer = create_installer(StateMode::Nonce);

        let result = installer
            .begin_install(Some("foo.myshopify.com"))
            .await
            .unwrap();

        assert_eq!(result.state.as_ref().len(), StateParam::NONCE_LENGTH);
        assert_eq!(
            installer.states.take(&result.state).await,
            Some(result.shop.clone())
        );
    }

    #[tokio::test]
    async fn test_nonce_mode_generates_unique_states() {
        let installer = create_installer(StateMode::Nonce);

        let a = installer.begin_install(Some("foo.myshopify.com")).await.unwrap();
        let b = installer.begin_install(Some("foo.myshopify.com")).await.unwrap();

        assert_ne!(a.state, b.state);
    }
}
