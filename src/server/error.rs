//! Unified error handling for the HTTP layer.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::oauth::OAuthError;
use crate::discounts::DiscountError;
use crate::server::pages::InstallFailedPage;

/// Application-level error type for request handlers.
///
/// This is the only place HTTP status codes are chosen. Response bodies
/// carry fixed public messages; the full error is logged.
#[derive(Debug, Error)]
pub enum AppError {
    /// The install initiator rejected the request. Rendered as JSON.
    #[error("Install error: {0}")]
    Install(OAuthError),

    /// The OAuth callback failed. Rendered as an HTML page.
    #[error("Callback error: {0}")]
    Callback(OAuthError),

    /// A discount operation failed.
    #[error("Discount error: {0}")]
    Discount(#[from] DiscountError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Install(e) | Self::Callback(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Discount(DiscountError::Invalid { .. }) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Install(_)
            | Self::Callback(_)
            | Self::Discount(DiscountError::Storage(_))
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Install(e) if e.is_client_error() => e.public_message().to_string(),
            Self::Install(_) => "Authentication failed".to_string(),
            Self::Callback(e) => e.public_message().to_string(),
            Self::Discount(DiscountError::Invalid { reason }) => reason.clone(),
            Self::BadRequest(message) => message.clone(),
            Self::Discount(DiscountError::Storage(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let message = self.public_message();
        if matches!(self, Self::Callback(_)) {
            let page = InstallFailedPage { message: &message };
            return match page.render() {
                Ok(html) => (status, Html(html)).into_response(),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to render failure page");
                    (status, message).into_response()
                }
            };
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Install(OAuthError::MissingShop).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Install(OAuthError::Unknown("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Callback(OAuthError::MissingParameters).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Callback(OAuthError::InvalidState).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Discount(DiscountError::Invalid {
                reason: "x".to_string()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_install_server_error_hides_details() {
        let response = AppError::Install(OAuthError::Unknown("secret detail".to_string()))
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, json!({ "error": "Authentication failed" }));
    }

    #[tokio::test]
    async fn test_callback_error_renders_html_without_upstream_body() {
        let response = AppError::Callback(OAuthError::TokenExchangeFailed {
            status: 401,
            message: "upstream-secret-body".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let body = body_string(response).await;
        assert!(body.contains("Installation Failed"));
        assert!(body.contains("Installation failed"));
        assert!(!body.contains("upstream-secret-body"));
    }
}
