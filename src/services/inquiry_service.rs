//! Inquiry Service - buyer questions on a listing. Create-only, no state
//! machine; the listing owner reads them from the dashboard.

use sea_orm::*;
use validator::ValidateEmail;

use super::ServiceError;
use crate::models::inquiry::{self, Entity as Inquiry, InquiryWithListing};
use crate::models::listing::{self, Entity as Listing};
use crate::models::user;

/// Fields accepted from the inquiry form
#[derive(Debug, Clone, Default)]
pub struct InquiryInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Record an inquiry. Authenticated senders are linked to the row and get
/// their account username/email filled in for blank fields; anonymous
/// senders must provide both.
pub async fn submit(
    db: &DatabaseConnection,
    listing: &listing::Model,
    sender: Option<&user::Model>,
    input: InquiryInput,
) -> Result<inquiry::Model, ServiceError> {
    let mut name = input.name.trim().to_owned();
    let mut email = input.email.trim().to_owned();
    let message = input.message.trim().to_owned();

    if let Some(sender) = sender {
        if name.is_empty() {
            name = sender.username.clone();
        }
        if email.is_empty() {
            email = sender.email.clone().unwrap_or_default();
        }
    }

    if name.is_empty() {
        return Err(ServiceError::validation("name", "This field is required."));
    }
    if !email.validate_email() {
        return Err(ServiceError::validation(
            "email",
            "Enter a valid email address.",
        ));
    }
    if message.is_empty() {
        return Err(ServiceError::validation(
            "message",
            "This field is required.",
        ));
    }

    let model = inquiry::ActiveModel {
        listing_id: Set(listing.id),
        sender_id: Set(sender.map(|u| u.id)),
        name: Set(name),
        email: Set(email),
        message: Set(message),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Inquiry {} recorded on listing '{}'", model.id, listing.slug);

    Ok(model)
}

/// Inquiries received across all listings owned by `owner_id`, newest first.
pub async fn received(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<InquiryWithListing>, ServiceError> {
    let inquiries_with_listings = Inquiry::find()
        .find_also_related(Listing)
        .filter(listing::Column::OwnerId.eq(owner_id))
        .order_by_desc(inquiry::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(inquiries_with_listings
        .into_iter()
        .filter_map(|(inquiry, listing)| {
            let listing = listing?;
            Some(InquiryWithListing {
                id: inquiry.id,
                listing_id: inquiry.listing_id,
                listing_title: listing.title,
                listing_slug: listing.slug,
                sender_id: inquiry.sender_id,
                name: inquiry.name,
                email: inquiry.email,
                message: inquiry.message,
                created_at: inquiry.created_at,
            })
        })
        .collect())
}
