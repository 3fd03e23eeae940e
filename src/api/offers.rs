use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::auth::Claims;
use crate::services::offer_service;

/// POST /offers/:id/:status - the seller decides an offer. The target must
/// be `accepted` or `rejected`, the caller must own the parent listing, and
/// a decided offer stays decided.
pub async fn update_offer_status(
    State(db): State<DatabaseConnection>,
    Path((id, status)): Path<(i32, String)>,
    claims: Claims,
) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match offer_service::transition(&db, id, user.id, &status).await {
        Ok(offer) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Offer marked as {}.", offer.status),
                "offer": offer
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}
