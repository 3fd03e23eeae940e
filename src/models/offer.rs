use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub listing_id: i32,
    pub user_id: i32,
    pub amount: f64,
    pub message: String,
    #[sea_orm(default_value = "pending")]
    pub status: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Listing,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Offer enriched with listing and offeror context for dashboard views.
#[derive(Debug, Clone, Serialize)]
pub struct OfferWithListing {
    pub id: i32,
    pub listing_id: i32,
    pub listing_title: String,
    pub listing_slug: String,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offered_by: Option<String>,
    pub amount: f64,
    pub message: String,
    pub status: String,
    pub created_at: String,
}
