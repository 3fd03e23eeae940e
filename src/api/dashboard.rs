use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::auth::Claims;
use crate::models::{ProfileDto, UserDto};
use crate::services::{inquiry_service, listing_service, offer_service, profile_service};

/// GET /dashboard - everything the current user cares about in one shot:
/// their listings, the offers flowing both ways, inquiries from buyers,
/// and their profile.
pub async fn dashboard(State(db): State<DatabaseConnection>, claims: Claims) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let profile = match profile_service::get_or_create(&db, user.id).await {
        Ok(p) => p,
        Err(e) => return super::service_error(e),
    };

    let my_listings = match listing_service::list_for_owner(&db, user.id).await {
        Ok(l) => l,
        Err(e) => return super::service_error(e),
    };

    let offers_received = match offer_service::received(&db, user.id).await {
        Ok(o) => o,
        Err(e) => return super::service_error(e),
    };

    let offers_made = match offer_service::made(&db, user.id).await {
        Ok(o) => o,
        Err(e) => return super::service_error(e),
    };

    let inquiries = match inquiry_service::received(&db, user.id).await {
        Ok(i) => i,
        Err(e) => return super::service_error(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "user": UserDto::from(user),
            "listings": my_listings,
            "offers_received": offers_received,
            "offers_made": offers_made,
            "inquiries": inquiries,
            "profile": ProfileDto::from(profile),
        })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub city: String,
}

/// POST /dashboard - update the profile sub-form
pub async fn update_profile(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match profile_service::update(&db, user.id, payload.phone_number, payload.city).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(json!({
                "message": "Profile updated.",
                "profile": ProfileDto::from(profile)
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}
