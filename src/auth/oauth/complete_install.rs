//! OAuth callback handling and authorization code exchange.
//!
//! [`Installer::complete_install`] runs once per callback request and moves
//! through [`InstallPhase`]s:
//!
//! ```text
//! Received -> TokenValidated -> ExchangeInFlight -> Installed
//!     |              |                  |
//!     +--------------+------------------+--------> Failed
//! ```
//!
//! There is no retry transition. Every rejection happens before the
//! outbound call, so invalid input never causes a network side effect.
//!
//! # Checks, in order
//!
//! 1. `code` and `shop` are present
//! 2. The HMAC signature, when [`AppConfig::verify_hmac`] is on
//! 3. The `state` corresponds to `shop`
//! 4. `shop` is a well-formed `*.myshopify.com` identifier
//!
//! [`AppConfig::verify_hmac`]: crate::AppConfig::verify_hmac

use crate::auth::oauth::hmac::{constant_time_compare, validate_hmac};
use crate::auth::oauth::{CallbackParams, Installer, OAuthError, StateMode, StateParam};
use crate::auth::{AccessTokenResponse, InstalledShop, ShopDomain};
use serde::Serialize;
use std::fmt;

/// Phases of a single callback request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallPhase {
    /// The callback arrived.
    Received,
    /// The anti-forgery token matched the shop.
    TokenValidated,
    /// The code exchange request is outstanding.
    ExchangeInFlight,
    /// An access token was obtained.
    Installed,
    /// The request was rejected or the exchange failed.
    Failed,
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::TokenValidated => "token_validated",
            Self::ExchangeInFlight => "exchange_in_flight",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

impl Installer {
    /// Validates an OAuth callback and exchanges its code for an access token.
    ///
    /// Makes at most one POST to the shop's token endpoint. The token is
    /// returned to the caller and not stored.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::MissingParameters`] if `code` or `shop` is absent
    /// - [`OAuthError::InvalidHmac`] if HMAC verification is on and fails
    /// - [`OAuthError::InvalidState`] if `state` does not correspond to `shop`
    /// - [`OAuthError::InvalidShopFormat`] if `shop` is malformed
    /// - [`OAuthError::TokenExchangeFailed`] on a non-2xx answer, a transport
    ///   error, or an unparseable body
    /// - [`OAuthError::Timeout`] if the exchange exceeds the configured timeout
    pub async fn complete_install(&self, params: &CallbackParams) -> Result<InstalledShop, OAuthError> {
        let result = self.run_callback(params).await;
        match &result {
            Ok(installed) => {
                tracing::info!(
                    shop = %installed.shop,
                    phase = %InstallPhase::Installed,
                    "Installation completed"
                );
            }
            Err(error) if error.is_client_error() => {
                tracing::warn!(phase = %InstallPhase::Failed, %error, "Rejected callback");
            }
            Err(error) => {
                tracing::error!(phase = %InstallPhase::Failed, %error, "Installation failed");
            }
        }
        result
    }

    async fn run_callback(&self, params: &CallbackParams) -> Result<InstalledShop, OAuthError> {
        let (Some(code), Some(shop)) = (params.code(), params.shop()) else {
            return Err(OAuthError::MissingParameters);
        };
        tracing::info!(shop, phase = %InstallPhase::Received, "Received OAuth callback");

        if self.config.verify_hmac() && !validate_hmac(params, &self.config) {
            return Err(OAuthError::InvalidHmac);
        }

        self.verify_state(params.state(), shop).await?;
        let shop = ShopDomain::parse(shop)?;
        tracing::info!(shop = %shop, phase = %InstallPhase::TokenValidated, "State verified");

        self.exchange_code(&shop, code).await
    }

    async fn verify_state(&self, state: Option<&str>, shop: &str) -> Result<(), OAuthError> {
        let state = StateParam::from_raw(state.ok_or(OAuthError::InvalidState)?);

        let expected = match self.config.state_mode() {
            StateMode::ShopEncoded => state.decode_shop(),
            StateMode::Nonce => self
                .states
                .take(&state)
                .await
                .map(|issued_for| issued_for.as_ref().to_string()),
        };

        match expected {
            Some(expected) if constant_time_compare(&expected, shop) => Ok(()),
            _ => Err(OAuthError::InvalidState),
        }
    }

    fn token_url(&self, shop: &ShopDomain) -> String {
        const TOKEN_PATH: &str = "/admin/oauth/access_token";
        self.config.shop_origin().map_or_else(
            || format!("https://{}{TOKEN_PATH}", shop.as_ref()),
            |origin| origin.join(TOKEN_PATH),
        )
    }

    async fn exchange_code(&self, shop: &ShopDomain, code: &str) -> Result<InstalledShop, OAuthError> {
        let timeout = self.config.exchange_timeout();
        let request_body = AccessTokenRequest {
            client_id: self.config.api_key().as_ref(),
            client_secret: self.config.api_secret_key().as_ref(),
            code,
        };

        // The request timeout also covers reading the body.
        let transport_error = |e: reqwest::Error, status: u16, context: &str| {
            if e.is_timeout() {
                OAuthError::Timeout { after: timeout }
            } else {
                OAuthError::TokenExchangeFailed {
                    status,
                    message: format!("{context}: {e}"),
                }
            }
        };

        tracing::info!(shop = %shop, phase = %InstallPhase::ExchangeInFlight, "Exchanging authorization code");
        let response = self
            .http
            .post(self.token_url(shop))
            .timeout(timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| transport_error(e, 0, "Network error"))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response
                .text()
                .await
                .map_err(|e| transport_error(e, status, "Failed to read error response"))?;
            return Err(OAuthError::TokenExchangeFailed {
                status,
                message: error_body,
            });
        }

        let token_response: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, status, "Failed to parse token response"))?;

        Ok(InstalledShop::from_access_token_response(
            shop.clone(),
            token_response,
        ))
    }
}
