use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{create_jwt, verify_password, Claims};
use crate::models::UserDto;
use crate::services::{user_service, user_service::RegisterInput};

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.username);

    let user = match user_service::find_by_username(&db, &payload.username).await {
        Ok(Some(u)) => u,
        _ => {
            tracing::warn!("User not found: {}", payload.username);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {
            let token = match create_jwt(&user.username) {
                Ok(t) => t,
                Err(e) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": e })),
                    )
                        .into_response();
                }
            };
            (StatusCode::OK, Json(json!({ "token": token }))).into_response()
        }
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct LoginFormQuery {
    pub next: Option<String>,
}

/// Landing page for auth redirects. Echoes where the caller was headed so a
/// client can send them back after logging in.
pub async fn login_form(Query(params): Query<LoginFormQuery>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "detail": "POST username and password to log in.",
            "next": params.next
        })),
    )
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

/// Signed-in users have no business on the signup page
pub async fn register_form(claims: Option<Claims>) -> impl IntoResponse {
    if claims.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    (
        StatusCode::OK,
        Json(json!({
            "detail": "POST username, password and an optional email to create an account."
        })),
    )
        .into_response()
}

/// Create an account and hand back a token right away, so signup doubles
/// as the first login.
pub async fn register(
    State(db): State<DatabaseConnection>,
    claims: Option<Claims>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if claims.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let input = RegisterInput {
        username: payload.username,
        email: payload.email,
        password: payload.password,
    };

    match user_service::register(&db, input).await {
        Ok(user) => {
            let token = match create_jwt(&user.username) {
                Ok(t) => t,
                Err(e) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": e })),
                    )
                        .into_response();
                }
            };
            (
                StatusCode::CREATED,
                Json(json!({
                    "token": token,
                    "user": UserDto::from(user)
                })),
            )
                .into_response()
        }
        Err(e) => super::service_error(e),
    }
}
