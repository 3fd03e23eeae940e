use sea_orm::*;

use crate::auth::hash_password;
use crate::models::{category, listing, user};
use crate::utils::slug::slugify;

/// Seed demo accounts, the default category set and a sample listing.
/// No-op when the database already has users, so restarts are safe.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = user::Entity::find().count(db).await?;
    if existing > 0 {
        tracing::debug!("Skipping seed, database already populated");
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();

    // 1. Demo users
    let alice_password = hash_password("alice-demo-password")
        .map_err(DbErr::Custom)?;
    let bob_password = hash_password("bob-demo-password")
        .map_err(DbErr::Custom)?;

    let alice = user::ActiveModel {
        username: Set("alice".to_owned()),
        email: Set(Some("alice@example.com".to_owned())),
        password_hash: Set(alice_password),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    user::ActiveModel {
        username: Set("bob".to_owned()),
        email: Set(Some("bob@example.com".to_owned())),
        password_hash: Set(bob_password),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // 2. Default categories
    let categories = [
        ("Electronics", "Phones, computers and gadgets"),
        ("Furniture", "Tables, chairs and storage"),
        ("Books", "Fiction, non-fiction and textbooks"),
        ("Sports", "Gear for indoors and outdoors"),
        ("Other", "Everything else"),
    ];

    let mut electronics_id = None;
    for (name, description) in categories {
        let cat = category::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slugify(name)),
            description: Set(description.to_owned()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        if name == "Electronics" {
            electronics_id = Some(cat.id);
        }
    }

    // 3. A sample listing so the browse page is not empty
    if let Some(category_id) = electronics_id {
        listing::ActiveModel {
            title: Set("Second-hand laptop".to_owned()),
            slug: Set(slugify("Second-hand laptop")),
            description: Set("Three years old, battery replaced last spring.".to_owned()),
            price: Set(350.0),
            category_id: Set(category_id),
            condition: Set("good".to_owned()),
            location: Set("Lyon".to_owned()),
            image_url: Set(None),
            status: Set("active".to_owned()),
            owner_id: Set(alice.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    tracing::info!("Demo data seeded");

    Ok(())
}
