//! Request handlers.

use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::oauth::CallbackParams;
use crate::discounts::{Discount, NewDiscount};
use crate::server::error::AppError;
use crate::server::pages::InstallSuccessPage;
use crate::server::AppState;

/// Query string of `GET /auth`.
#[derive(Debug, Deserialize)]
pub struct InstallQuery {
    shop: Option<String>,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Shopify app is running",
        "endpoints": {
            "auth": "/auth",
            "callback": state.installer.config().callback_path(),
        },
    }))
}

/// `GET /auth?shop=<shop>`: redirects to the platform's consent screen.
pub async fn begin_install(
    State(state): State<AppState>,
    Query(query): Query<InstallQuery>,
) -> Result<Response, AppError> {
    let result = state
        .installer
        .begin_install(query.shop.as_deref())
        .await
        .map_err(AppError::Install)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, result.auth_url)]).into_response())
}

/// `GET <callback_path>`: completes the install and renders the result page.
pub async fn complete_install(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<String>, AppError> {
    let installed = state
        .installer
        .complete_install(&params)
        .await
        .map_err(AppError::Callback)?;

    let html = InstallSuccessPage::new(&installed.shop)
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Html(html))
}

/// `POST /api/discounts`
pub async fn create_discount(
    State(state): State<AppState>,
    body: Result<Json<NewDiscount>, JsonRejection>,
) -> Result<(StatusCode, Json<Discount>), AppError> {
    let Json(new_discount) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    new_discount.validate()?;

    let discount = state.discounts.create(new_discount).await?;
    tracing::info!(id = discount.id, code = %discount.code, "Created discount");
    Ok((StatusCode::CREATED, Json(discount)))
}

/// `GET /api/discounts`
pub async fn list_discounts(State(state): State<AppState>) -> Result<Json<Vec<Discount>>, AppError> {
    Ok(Json(state.discounts.list().await?))
}

/// `DELETE /api/discounts/{id}`: succeeds whether or not the id exists.
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: u64 = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid discount id".to_string()))?;

    if state.discounts.delete(id).await? {
        tracing::info!(id, "Deleted discount");
    }
    Ok(StatusCode::NO_CONTENT)
}
