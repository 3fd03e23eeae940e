use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{login_redirect, Claims};
use crate::models::category::CategoryDto;
use crate::models::listing::{CONDITIONS, STATUSES};
use crate::services::listing_service::{self, ListingFilter, ListingInput};
use crate::services::{inquiry_service, inquiry_service::InquiryInput, offer_service};

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<u64>,
}

/// GET / - public browse and search
#[utoipa::path(
    get,
    path = "/",
    params(
        ("q" = Option<String>, Query, description = "Free-text filter on title, description or location"),
        ("category" = Option<String>, Query, description = "Category slug filter"),
        ("page" = Option<u64>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "One page of active and reserved listings")
    )
)]
pub async fn browse_listings(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BrowseQuery>,
) -> Response {
    let filter = ListingFilter {
        query: params.q.clone(),
        category_slug: params.category.clone(),
        page: params.page.unwrap_or(1),
    };

    let categories = match listing_service::list_categories(&db).await {
        Ok(c) => c,
        Err(e) => return super::service_error(e),
    };

    match listing_service::browse(&db, filter).await {
        Ok(page) => (
            StatusCode::OK,
            Json(json!({
                "listings": page.listings,
                "total": page.total,
                "page": page.page,
                "pages": page.pages,
                "categories": categories.into_iter().map(CategoryDto::from).collect::<Vec<_>>(),
                "query": params.q.unwrap_or_default(),
                "selected_category": params.category.unwrap_or_default(),
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListingRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_id: i32,
    pub condition: String,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl From<ListingRequest> for ListingInput {
    fn from(req: ListingRequest) -> Self {
        ListingInput {
            title: req.title,
            description: req.description,
            price: req.price,
            category_id: req.category_id,
            condition: req.condition,
            location: req.location,
            image_url: req.image_url.filter(|u| !u.is_empty()),
            status: req.status,
        }
    }
}

/// GET /listings/new - what the create form needs to render
pub async fn new_listing_form(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Response {
    if let Err(resp) = super::current_user(&db, &claims).await {
        return resp;
    }

    match listing_service::list_categories(&db).await {
        Ok(categories) => (
            StatusCode::OK,
            Json(json!({
                "categories": categories.into_iter().map(CategoryDto::from).collect::<Vec<_>>(),
                "conditions": CONDITIONS,
                "statuses": STATUSES,
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}

/// POST /listings/new - publish a listing owned by the current user
pub async fn create_listing(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<ListingRequest>,
) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match listing_service::create(&db, user.id, payload.into()).await {
        Ok(listing) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Listing created and published.",
                "listing": listing
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}

/// GET /listings/:slug - public detail view
#[utoipa::path(
    get,
    path = "/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Listing detail"),
        (status = 404, description = "No listing with that slug")
    )
)]
pub async fn listing_detail(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
) -> Response {
    let listing = match listing_service::get_by_slug(&db, &slug).await {
        Ok(l) => l,
        Err(e) => return super::service_error(e),
    };

    let pending_offers = offer_service::pending_count(&db, listing.id)
        .await
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(json!({
            "listing": listing,
            "pending_offers": pending_offers,
        })),
    )
        .into_response()
}

/// Discriminated form posted to the detail page: an offer or an inquiry.
#[derive(Debug, Deserialize)]
pub struct DetailFormRequest {
    pub form_type: String,
    // offer fields
    pub amount: Option<f64>,
    pub message: Option<String>,
    // inquiry fields
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// POST /listings/:slug - submit an offer (auth required) or an inquiry
/// (open to anyone) against the listing, picked by `form_type`.
pub async fn listing_detail_post(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
    claims: Option<Claims>,
    Json(payload): Json<DetailFormRequest>,
) -> Response {
    let listing = match listing_service::find_by_slug(&db, &slug).await {
        Ok(l) => l,
        Err(e) => return super::service_error(e),
    };

    match payload.form_type.as_str() {
        "offer" => {
            let claims = match claims {
                Some(c) => c,
                None => {
                    // Remember the detail page so login can bounce back
                    return login_redirect(Some(&format!("/listings/{}", listing.slug)));
                }
            };
            let user = match super::current_user(&db, &claims).await {
                Ok(u) => u,
                Err(resp) => return resp,
            };

            let amount = payload.amount.unwrap_or(0.0);
            match offer_service::submit(&db, &listing, user.id, amount, payload.message).await {
                Ok(offer) => (
                    StatusCode::CREATED,
                    Json(json!({
                        "message": "Offer submitted to the seller.",
                        "offer": offer
                    })),
                )
                    .into_response(),
                Err(e) => super::service_error(e),
            }
        }
        "inquiry" => {
            let sender = match claims {
                Some(c) => match super::current_user(&db, &c).await {
                    Ok(u) => Some(u),
                    Err(resp) => return resp,
                },
                None => None,
            };

            let input = InquiryInput {
                name: payload.name,
                email: payload.email,
                message: payload.message.unwrap_or_default(),
            };

            match inquiry_service::submit(&db, &listing, sender.as_ref(), input).await {
                Ok(inquiry) => (
                    StatusCode::CREATED,
                    Json(json!({
                        "message": "Your question was sent to the seller.",
                        "inquiry": inquiry
                    })),
                )
                    .into_response(),
                Err(e) => super::service_error(e),
            }
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown form type '{}'", other) })),
        )
            .into_response(),
    }
}

/// GET /listings/:slug/edit - current values plus form choices, owner only
pub async fn edit_listing_form(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
    claims: Claims,
) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let listing = match listing_service::get_owned(&db, &slug, user.id).await {
        Ok(l) => l,
        Err(e) => return super::service_error(e),
    };

    let categories = match listing_service::list_categories(&db).await {
        Ok(c) => c,
        Err(e) => return super::service_error(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "listing": listing,
            "categories": categories.into_iter().map(CategoryDto::from).collect::<Vec<_>>(),
            "conditions": CONDITIONS,
            "statuses": STATUSES,
        })),
    )
        .into_response()
}

/// POST /listings/:slug/edit - update an owned listing
pub async fn update_listing(
    State(db): State<DatabaseConnection>,
    Path(slug): Path<String>,
    claims: Claims,
    Json(payload): Json<ListingRequest>,
) -> Response {
    let user = match super::current_user(&db, &claims).await {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match listing_service::update(&db, user.id, &slug, payload.into()).await {
        Ok(listing) => (
            StatusCode::OK,
            Json(json!({
                "message": "Listing updated.",
                "listing": listing
            })),
        )
            .into_response(),
        Err(e) => super::service_error(e),
    }
}
