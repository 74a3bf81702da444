//! HTTP surface of the app.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | `GET` | `/` | service index (JSON) |
//! | `GET` | `/auth?shop=` | `302` to the consent screen |
//! | `GET` | [`AppConfig::callback_path`] (`/auth/callback`) | install result page (HTML) |
//! | `POST` | `/api/discounts` | `201` + created discount |
//! | `GET` | `/api/discounts` | all discounts |
//! | `DELETE` | `/api/discounts/{id}` | `204` |
//!
//! [`AppConfig::callback_path`]: crate::AppConfig::callback_path

mod error;
mod pages;
mod routes;
mod state;

pub use error::AppError;
pub use state::AppState;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// The callback handler is mounted at the path the installer puts in its
/// `redirect_uri`.
pub fn router(state: AppState) -> Router {
    let callback_path = state.installer.config().callback_path().to_string();

    Router::new()
        .route("/", get(routes::index))
        .route("/auth", get(routes::begin_install))
        .route(&callback_path, get(routes::complete_install))
        .route(
            "/api/discounts",
            get(routes::list_discounts).post(routes::create_discount),
        )
        .route("/api/discounts/{id}", delete(routes::delete_discount))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
