use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::listings::browse_listings,
        api::listings::listing_detail,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "bazaar", description = "Bazaar marketplace API")
    )
)]
pub struct ApiDoc;
