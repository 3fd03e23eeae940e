//! Listing Service - browse/search, slug assignment, create and edit

use sea_orm::*;
use std::collections::HashMap;

use super::ServiceError;
use crate::models::category::{self, Entity as Category};
use crate::models::listing::{self, Entity as Listing, ListingDto, BROWSABLE_STATUSES, CONDITIONS, STATUSES};
use crate::models::user::{self, Entity as User};
use crate::utils::slug::slugify;

/// Listings per browse page
pub const PAGE_SIZE: u64 = 12;

/// Filter parameters for the public browse page
#[derive(Debug, Default, Clone)]
pub struct ListingFilter {
    pub query: Option<String>,
    pub category_slug: Option<String>,
    /// 1-based page number
    pub page: u64,
}

/// One page of browse results
#[derive(Debug)]
pub struct ListingPage {
    pub listings: Vec<ListingDto>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// Fields accepted when creating or editing a listing
#[derive(Debug, Clone)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_id: i32,
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: String,
}

async fn validate_input(db: &DatabaseConnection, input: &ListingInput) -> Result<(), ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::validation("title", "This field is required."));
    }
    if input.title.len() > 180 {
        return Err(ServiceError::validation(
            "title",
            "Ensure this value has at most 180 characters.",
        ));
    }
    if input.description.trim().is_empty() {
        return Err(ServiceError::validation(
            "description",
            "This field is required.",
        ));
    }
    if input.price <= 0.0 {
        return Err(ServiceError::validation(
            "price",
            "Price must be greater than zero.",
        ));
    }
    if input.location.trim().is_empty() {
        return Err(ServiceError::validation(
            "location",
            "This field is required.",
        ));
    }
    if !CONDITIONS.contains(&input.condition.as_str()) {
        return Err(ServiceError::validation(
            "condition",
            format!("'{}' is not a valid condition.", input.condition),
        ));
    }
    if !STATUSES.contains(&input.status.as_str()) {
        return Err(ServiceError::validation(
            "status",
            format!("'{}' is not a valid status.", input.status),
        ));
    }

    let category = Category::find_by_id(input.category_id).one(db).await?;
    if category.is_none() {
        return Err(ServiceError::validation(
            "category",
            "Select a valid category.",
        ));
    }

    Ok(())
}

/// Derive a unique slug from the title with a linear `-2`, `-3`, ... probe.
/// Two concurrent creations with identical titles can race past the probe;
/// the UNIQUE constraint on the column catches the loser.
async fn generate_unique_slug(db: &DatabaseConnection, title: &str) -> Result<String, ServiceError> {
    let base = {
        let s = slugify(title);
        if s.is_empty() { "listing".to_string() } else { s }
    };

    let mut candidate = base.clone();
    let mut counter = 1u32;
    loop {
        let taken = Listing::find()
            .filter(listing::Column::Slug.eq(candidate.as_str()))
            .count(db)
            .await?
            > 0;
        if !taken {
            return Ok(candidate);
        }
        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }
}

/// Attach category and owner names to a batch of listing models.
async fn enrich(
    db: &DatabaseConnection,
    models: Vec<listing::Model>,
) -> Result<Vec<ListingDto>, ServiceError> {
    let category_ids: Vec<i32> = models.iter().map(|l| l.category_id).collect();
    let owner_ids: Vec<i32> = models.iter().map(|l| l.owner_id).collect();

    let mut categories: HashMap<i32, category::Model> = HashMap::new();
    if !category_ids.is_empty() {
        for c in Category::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
        {
            categories.insert(c.id, c);
        }
    }

    let mut owners: HashMap<i32, user::Model> = HashMap::new();
    if !owner_ids.is_empty() {
        for u in User::find()
            .filter(user::Column::Id.is_in(owner_ids))
            .all(db)
            .await?
        {
            owners.insert(u.id, u);
        }
    }

    Ok(models
        .into_iter()
        .map(|l| {
            let category = categories.get(&l.category_id);
            let owner = owners.get(&l.owner_id);
            let mut dto = ListingDto::from(l);
            if let Some(c) = category {
                dto = dto.with_category(c);
            }
            if let Some(u) = owner {
                dto = dto.with_owner(u);
            }
            dto
        })
        .collect())
}

/// Public browse/search. Sold listings are never returned.
pub async fn browse(
    db: &DatabaseConnection,
    filter: ListingFilter,
) -> Result<ListingPage, ServiceError> {
    let mut condition =
        Condition::all().add(listing::Column::Status.is_in(BROWSABLE_STATUSES));

    if let Some(q) = filter.query.as_deref() {
        if !q.is_empty() {
            condition = condition.add(
                Condition::any()
                    .add(listing::Column::Title.contains(q))
                    .add(listing::Column::Description.contains(q))
                    .add(listing::Column::Location.contains(q)),
            );
        }
    }

    if let Some(slug) = filter.category_slug.as_deref() {
        if !slug.is_empty() {
            match Category::find()
                .filter(category::Column::Slug.eq(slug))
                .one(db)
                .await?
            {
                Some(c) => condition = condition.add(listing::Column::CategoryId.eq(c.id)),
                // Unknown category slug filters everything out
                None => {
                    return Ok(ListingPage {
                        listings: Vec::new(),
                        total: 0,
                        page: 1,
                        pages: 0,
                    });
                }
            }
        }
    }

    let paginator = Listing::find()
        .filter(condition)
        .order_by_desc(listing::Column::CreatedAt)
        .order_by_desc(listing::Column::Id)
        .paginate(db, PAGE_SIZE);

    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator.num_items_and_pages().await?;

    let page = filter.page.max(1);
    let models = paginator.fetch_page(page - 1).await?;

    Ok(ListingPage {
        listings: enrich(db, models).await?,
        total: number_of_items,
        page,
        pages: number_of_pages,
    })
}

/// Public detail lookup by slug
pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> Result<ListingDto, ServiceError> {
    let model = Listing::find()
        .filter(listing::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(enrich(db, vec![model]).await?.remove(0))
}

/// Raw model lookup by slug (for handlers that attach offers or inquiries)
pub async fn find_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<listing::Model, ServiceError> {
    Listing::find()
        .filter(listing::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Owner-scoped lookup; anyone else sees a missing resource
pub async fn get_owned(
    db: &DatabaseConnection,
    slug: &str,
    owner_id: i32,
) -> Result<listing::Model, ServiceError> {
    Listing::find()
        .filter(listing::Column::Slug.eq(slug))
        .filter(listing::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Create a listing owned by `owner_id`
pub async fn create(
    db: &DatabaseConnection,
    owner_id: i32,
    input: ListingInput,
) -> Result<ListingDto, ServiceError> {
    validate_input(db, &input).await?;

    let slug = generate_unique_slug(db, &input.title).await?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = listing::ActiveModel {
        title: Set(input.title),
        slug: Set(slug),
        description: Set(input.description),
        price: Set(input.price),
        category_id: Set(input.category_id),
        condition: Set(input.condition),
        location: Set(input.location),
        image_url: Set(input.image_url),
        status: Set(input.status),
        owner_id: Set(owner_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Listing '{}' created by user {}", model.slug, owner_id);

    Ok(enrich(db, vec![model]).await?.remove(0))
}

/// Edit an owned listing. The slug is assigned at creation and never
/// regenerated, so edits keep their URL.
pub async fn update(
    db: &DatabaseConnection,
    owner_id: i32,
    slug: &str,
    input: ListingInput,
) -> Result<ListingDto, ServiceError> {
    let existing = get_owned(db, slug, owner_id).await?;

    validate_input(db, &input).await?;

    let mut active: listing::ActiveModel = existing.into();
    active.title = Set(input.title);
    active.description = Set(input.description);
    active.price = Set(input.price);
    active.category_id = Set(input.category_id);
    active.condition = Set(input.condition);
    active.location = Set(input.location);
    active.image_url = Set(input.image_url);
    active.status = Set(input.status);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = active.update(db).await?;

    Ok(enrich(db, vec![model]).await?.remove(0))
}

/// All listings belonging to one user, newest first (dashboard view)
pub async fn list_for_owner(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<ListingDto>, ServiceError> {
    let models = Listing::find()
        .filter(listing::Column::OwnerId.eq(owner_id))
        .order_by_desc(listing::Column::CreatedAt)
        .order_by_desc(listing::Column::Id)
        .all(db)
        .await?;

    enrich(db, models).await
}

/// All categories, alphabetical (for filter menus and form scaffolds)
pub async fn list_categories(
    db: &DatabaseConnection,
) -> Result<Vec<category::Model>, ServiceError> {
    Ok(Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?)
}
