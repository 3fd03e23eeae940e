//! User Service - account registration and lookup

use sea_orm::*;
use validator::ValidateEmail;

use super::ServiceError;
use crate::auth::hash_password;
use crate::models::user::{self, Entity as User};

/// Fields accepted from the signup form
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

/// Create an account. The username must be unique and the password at
/// least 8 characters.
pub async fn register(
    db: &DatabaseConnection,
    input: RegisterInput,
) -> Result<user::Model, ServiceError> {
    let username = input.username.trim().to_owned();

    if username.is_empty() {
        return Err(ServiceError::validation(
            "username",
            "This field is required.",
        ));
    }
    if username.len() > 150 {
        return Err(ServiceError::validation(
            "username",
            "Ensure this value has at most 150 characters.",
        ));
    }
    if input.password.len() < 8 {
        return Err(ServiceError::validation(
            "password",
            "This password is too short. It must contain at least 8 characters.",
        ));
    }

    let email = match input.email {
        Some(e) if !e.trim().is_empty() => {
            let e = e.trim().to_owned();
            if !e.validate_email() {
                return Err(ServiceError::validation(
                    "email",
                    "Enter a valid email address.",
                ));
            }
            Some(e)
        }
        _ => None,
    };

    let taken = User::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .count(db)
        .await?
        > 0;
    if taken {
        return Err(ServiceError::validation(
            "username",
            "A user with that username already exists.",
        ));
    }

    let password_hash =
        hash_password(&input.password).map_err(ServiceError::Database)?;

    let now = chrono::Utc::now().to_rfc3339();
    let model = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Registered user '{}'", model.username);

    Ok(model)
}

/// Look an account up by username (used to resolve JWT claims)
pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, ServiceError> {
    Ok(User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?)
}
