//! Profile Service - the one-per-user contact card edited from the dashboard

use sea_orm::*;

use super::ServiceError;
use crate::models::user_profile::{self, Entity as UserProfile};

/// Fetch the user's profile, creating an empty one on first access so the
/// dashboard never trips over a missing row.
pub async fn get_or_create(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<user_profile::Model, ServiceError> {
    if let Some(profile) = UserProfile::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        return Ok(profile);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let profile = user_profile::ActiveModel {
        user_id: Set(user_id),
        phone_number: Set(String::new()),
        city: Set(String::new()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("Created empty profile for user {}", user_id);

    Ok(profile)
}

/// Update phone number and city from the dashboard form
pub async fn update(
    db: &DatabaseConnection,
    user_id: i32,
    phone_number: String,
    city: String,
) -> Result<user_profile::Model, ServiceError> {
    if phone_number.len() > 20 {
        return Err(ServiceError::validation(
            "phone_number",
            "Ensure this value has at most 20 characters.",
        ));
    }
    if city.len() > 120 {
        return Err(ServiceError::validation(
            "city",
            "Ensure this value has at most 120 characters.",
        ));
    }

    let existing = get_or_create(db, user_id).await?;

    let mut active: user_profile::ActiveModel = existing.into();
    active.phone_number = Set(phone_number);
    active.city = Set(city);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    Ok(active.update(db).await?)
}
