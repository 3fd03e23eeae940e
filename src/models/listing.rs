use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allowed values for the `condition` column.
pub const CONDITIONS: [&str; 4] = ["new", "like_new", "good", "fair"];

/// Allowed values for the `status` column.
pub const STATUSES: [&str; 3] = ["active", "reserved", "sold"];

/// Statuses shown on the public browse page. Sold listings never appear.
pub const BROWSABLE_STATUSES: [&str; 2] = ["active", "reserved"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category_id: i32,
    #[sea_orm(default_value = "good")]
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
    #[sea_orm(default_value = "active")]
    pub status: String,
    pub owner_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::offer::Entity")]
    Offers,
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiries,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Listing enriched with category and owner names for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: String,
    pub owner_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for ListingDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            price: model.price,
            category_id: model.category_id,
            category_name: None,
            category_slug: None,
            condition: model.condition,
            location: model.location,
            image_url: model.image_url,
            status: model.status,
            owner_id: model.owner_id,
            owner_username: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ListingDto {
    pub fn with_category(mut self, category: &super::category::Model) -> Self {
        self.category_name = Some(category.name.clone());
        self.category_slug = Some(category.slug.clone());
        self
    }

    pub fn with_owner(mut self, owner: &super::user::Model) -> Self {
        self.owner_username = Some(owner.username.clone());
        self
    }
}
