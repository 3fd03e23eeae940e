pub mod auth;
pub mod dashboard;
pub mod health;
pub mod listings;
pub mod offers;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::auth::{login_redirect, Claims};
use crate::models::user;
use crate::services::{user_service, ServiceError};

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Browse & search
        .route("/", get(listings::browse_listings))
        // Listings
        .route(
            "/listings/new",
            get(listings::new_listing_form).post(listings::create_listing),
        )
        .route(
            "/listings/:slug",
            get(listings::listing_detail).post(listings::listing_detail_post),
        )
        .route(
            "/listings/:slug/edit",
            get(listings::edit_listing_form).post(listings::update_listing),
        )
        // Offers
        .route("/offers/:id/:status", post(offers::update_offer_status))
        // Dashboard
        .route(
            "/dashboard",
            get(dashboard::dashboard).post(dashboard::update_profile),
        )
        // Accounts
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .with_state(db)
}

/// Map a service failure onto the HTTP surface: validation errors land back
/// on the originating form as 422, missing and not-owned resources are both
/// 404, state-machine refusals are 409.
pub(crate) fn service_error(err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not found" })),
        )
            .into_response(),
        ServiceError::Validation { field, message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "success": false,
                "errors": { field: message }
            })),
        )
            .into_response(),
        ServiceError::InvalidState(message) => (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response(),
        ServiceError::Database(message) => {
            tracing::error!("Database error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}

/// Resolve the authenticated account behind a set of claims. A token whose
/// account has disappeared is treated like any other anonymous request.
pub(crate) async fn current_user(
    db: &DatabaseConnection,
    claims: &Claims,
) -> Result<user::Model, Response> {
    match user_service::find_by_username(db, &claims.sub).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(login_redirect(None)),
        Err(e) => Err(service_error(e)),
    }
}
