//! Error types for the installation handshake.
//!
//! # Error Types
//!
//! - [`OAuthError::MissingShop`]: `shop` parameter absent on install
//! - [`OAuthError::InvalidShopFormat`]: `shop` is not a `*.myshopify.com` host
//! - [`OAuthError::MissingParameters`]: `code` or `shop` absent on callback
//! - [`OAuthError::InvalidState`]: anti-forgery token check failed
//! - [`OAuthError::InvalidHmac`]: callback signature check failed
//! - [`OAuthError::TokenExchangeFailed`]: token endpoint returned non-2xx or was unreachable
//! - [`OAuthError::Timeout`]: token endpoint did not answer in time
//! - [`OAuthError::Unknown`]: anything else
//!
//! Every variant is terminal for its request; nothing is retried.
//!
//! # Example
//!
//! ```rust
//! use shopify_installer::auth::oauth::OAuthError;
//!
//! let error = OAuthError::TokenExchangeFailed {
//!     status: 401,
//!     message: "invalid_client".to_string(),
//! };
//! assert!(error.to_string().contains("401"));
//! assert!(error.is_server_error());
//! // Upstream details stay out of the client-facing message.
//! assert_eq!(error.public_message(), "Installation failed");
//! ```

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during the installation handshake.
///
/// `Display` carries full diagnostic detail and is meant for logs. Use
/// [`OAuthError::public_message`] for anything sent back to a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// The install request carried no shop identifier.
    #[error("Missing shop parameter")]
    MissingShop,

    /// The shop identifier does not look like `name.myshopify.com`.
    #[error("Invalid shop format: '{shop}'")]
    InvalidShopFormat {
        /// The rejected identifier.
        shop: String,
    },

    /// The callback is missing `code` or `shop`.
    #[error("Missing required parameters")]
    MissingParameters,

    /// The callback's state does not correspond to its shop.
    ///
    /// Either the request was forged, or it belongs to another
    /// installation flow.
    #[error("Invalid state parameter")]
    InvalidState,

    /// The callback's HMAC signature does not match.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The token endpoint answered with a non-success status, or could not
    /// be reached (`status` is 0 in that case).
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// HTTP status returned by the platform.
        status: u16,
        /// Response body or transport error text.
        message: String,
    },

    /// The token endpoint did not answer within the configured timeout.
    #[error("Token exchange timed out after {after:?}")]
    Timeout {
        /// The configured timeout.
        after: Duration,
    },

    /// Catch-all for unexpected failures.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OAuthError {
    /// Returns `true` for errors caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingShop | Self::InvalidShopFormat { .. } | Self::MissingParameters
        )
    }

    /// Returns `true` for forgery and upstream failures.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns a short, fixed message that is safe to show to end users.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingShop => "Missing shop parameter",
            Self::InvalidShopFormat { .. } => "Invalid shop format",
            Self::MissingParameters => "Missing required parameters",
            Self::InvalidState | Self::InvalidHmac => "Invalid request signature",
            Self::TokenExchangeFailed { .. } | Self::Timeout { .. } | Self::Unknown(_) => {
                "Installation failed"
            }
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert!(OAuthError::MissingShop.is_client_error());
        assert!(OAuthError::InvalidShopFormat {
            shop: "x".to_string()
        }
        .is_client_error());
        assert!(OAuthError::MissingParameters.is_client_error());
    }

    #[test]
    fn test_forgery_and_upstream_errors_are_server_errors() {
        assert!(OAuthError::InvalidState.is_server_error());
        assert!(OAuthError::InvalidHmac.is_server_error());
        assert!(OAuthError::Timeout {
            after: Duration::from_secs(10)
        }
        .is_server_error());
        assert!(OAuthError::TokenExchangeFailed {
            status: 500,
            message: String::new()
        }
        .is_server_error());
        assert!(OAuthError::Unknown("boom".to_string()).is_server_error());
    }

    #[test]
    fn test_token_exchange_failed_keeps_upstream_details() {
        let error = OAuthError::TokenExchangeFailed {
            status: 401,
            message: r#"{"error":"invalid_request"}"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid_request"));
    }

    #[test]
    fn test_timeout_reports_sub_second_durations() {
        let error = OAuthError::Timeout {
            after: Duration::from_millis(250),
        };
        assert_eq!(error.to_string(), "Token exchange timed out after 250ms");
    }

    #[test]
    fn test_public_message_never_contains_internal_text() {
        let errors = [
            OAuthError::InvalidShopFormat {
                shop: "<script>".to_string(),
            },
            OAuthError::TokenExchangeFailed {
                status: 502,
                message: "upstream stack trace".to_string(),
            },
            OAuthError::Unknown("panic at the disco".to_string()),
        ];

        for error in errors {
            let public = error.public_message();
            assert!(!public.contains("<script>"));
            assert!(!public.contains("stack trace"));
            assert!(!public.contains("disco"));
        }
    }

    #[test]
    fn test_oauth_error_implements_std_error() {
        let error: &dyn std::error::Error = &OAuthError::InvalidState;
        assert_eq!(error.to_string(), "Invalid state parameter");
    }
}
