//! Offer Service - submissions and the pending -> accepted | rejected
//! state machine. Both outcomes are terminal: once a seller has decided,
//! the decision sticks.

use sea_orm::*;
use std::collections::HashMap;

use super::ServiceError;
use crate::models::listing::{self, Entity as Listing};
use crate::models::offer::{self, Entity as Offer, OfferWithListing};
use crate::models::user::{self, Entity as User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OfferStatus::Pending),
            "accepted" => Some(OfferStatus::Accepted),
            "rejected" => Some(OfferStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Accepted | OfferStatus::Rejected)
    }
}

/// Submit an offer on a listing. Offers start out pending.
pub async fn submit(
    db: &DatabaseConnection,
    listing: &listing::Model,
    user_id: i32,
    amount: f64,
    message: Option<String>,
) -> Result<offer::Model, ServiceError> {
    if amount <= 0.0 {
        return Err(ServiceError::validation(
            "amount",
            "Offer must be greater than zero.",
        ));
    }

    let model = offer::ActiveModel {
        listing_id: Set(listing.id),
        user_id: Set(user_id),
        amount: Set(amount),
        message: Set(message.unwrap_or_default()),
        status: Set(OfferStatus::Pending.as_str().to_owned()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Offer {} ({}) submitted on listing '{}'",
        model.id,
        model.amount,
        listing.slug
    );

    Ok(model)
}

/// Transition an offer's status. Only the owner of the parent listing may
/// decide, and only from a non-terminal state to a terminal one. Ownership
/// failures surface as NotFound, like every other owned resource.
pub async fn transition(
    db: &DatabaseConnection,
    offer_id: i32,
    owner_id: i32,
    target: &str,
) -> Result<offer::Model, ServiceError> {
    let target = match OfferStatus::parse(target) {
        Some(s) if s.is_terminal() => s,
        _ => {
            return Err(ServiceError::validation(
                "status",
                format!("'{}' is not a valid offer decision.", target),
            ));
        }
    };

    let (offer, listing) = Offer::find_by_id(offer_id)
        .find_also_related(Listing)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let listing = listing.ok_or(ServiceError::NotFound)?;
    if listing.owner_id != owner_id {
        return Err(ServiceError::NotFound);
    }

    let current = OfferStatus::parse(&offer.status).unwrap_or(OfferStatus::Pending);
    if current.is_terminal() {
        return Err(ServiceError::InvalidState(format!(
            "Offer has already been {}.",
            current.as_str()
        )));
    }

    let mut active: offer::ActiveModel = offer.into();
    active.status = Set(target.as_str().to_owned());
    let model = active.update(db).await?;

    tracing::info!("Offer {} marked as {}", model.id, model.status);

    Ok(model)
}

fn with_listing_details(
    offer: offer::Model,
    listing: &listing::Model,
    offered_by: Option<String>,
) -> OfferWithListing {
    OfferWithListing {
        id: offer.id,
        listing_id: offer.listing_id,
        listing_title: listing.title.clone(),
        listing_slug: listing.slug.clone(),
        user_id: offer.user_id,
        offered_by,
        amount: offer.amount,
        message: offer.message,
        status: offer.status,
        created_at: offer.created_at,
    }
}

/// Offers received across all listings owned by `owner_id`, newest first,
/// with the offeror's username attached.
pub async fn received(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<OfferWithListing>, ServiceError> {
    let offers_with_listings = Offer::find()
        .find_also_related(Listing)
        .filter(listing::Column::OwnerId.eq(owner_id))
        .order_by_desc(offer::Column::CreatedAt)
        .all(db)
        .await?;

    let user_ids: Vec<i32> = offers_with_listings.iter().map(|(o, _)| o.user_id).collect();

    let mut usernames: HashMap<i32, String> = HashMap::new();
    if !user_ids.is_empty() {
        for u in User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
        {
            usernames.insert(u.id, u.username);
        }
    }

    Ok(offers_with_listings
        .into_iter()
        .filter_map(|(offer, listing)| {
            let listing = listing?;
            let offered_by = usernames.get(&offer.user_id).cloned();
            Some(with_listing_details(offer, &listing, offered_by))
        })
        .collect())
}

/// Offers this user has made on other people's listings, newest first.
pub async fn made(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<OfferWithListing>, ServiceError> {
    let offers_with_listings = Offer::find()
        .find_also_related(Listing)
        .filter(offer::Column::UserId.eq(user_id))
        .order_by_desc(offer::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(offers_with_listings
        .into_iter()
        .filter_map(|(offer, listing)| {
            let listing = listing?;
            Some(with_listing_details(offer, &listing, None))
        })
        .collect())
}

/// Number of undecided offers on one listing (shown on the detail page)
pub async fn pending_count(
    db: &DatabaseConnection,
    listing_id: i32,
) -> Result<u64, ServiceError> {
    Ok(Offer::find()
        .filter(offer::Column::ListingId.eq(listing_id))
        .filter(offer::Column::Status.eq(OfferStatus::Pending.as_str()))
        .count(db)
        .await?)
}
