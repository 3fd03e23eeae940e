use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tower::util::ServiceExt; // for `oneshot`

use bazaar::models::{category, inquiry, listing, offer, user, user_profile};
use bazaar::{api, auth, db};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_app(db: &DatabaseConnection) -> Router {
    api::api_router(db.clone())
}

// Helper to create a test user
async fn create_test_user(db: &DatabaseConnection, username: &str) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(Some(format!("{}@example.com", username))),
        password_hash: Set("$argon2id$dummy".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    user.insert(db).await.expect("Failed to create user")
}

// Helper to create a test category
async fn create_test_category(db: &DatabaseConnection, name: &str, slug: &str) -> category::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let cat = category::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        description: Set(String::new()),
        created_at: Set(now),
        ..Default::default()
    };
    cat.insert(db).await.expect("Failed to create category")
}

// Helper to create a test listing directly in the database
async fn create_test_listing(
    db: &DatabaseConnection,
    owner_id: i32,
    category_id: i32,
    title: &str,
    slug: &str,
    price: f64,
    status: &str,
) -> listing::Model {
    let now = chrono::Utc::now().to_rfc3339();
    let listing = listing::ActiveModel {
        title: Set(title.to_string()),
        slug: Set(slug.to_string()),
        description: Set("A test listing".to_string()),
        price: Set(price),
        category_id: Set(category_id),
        condition: Set("good".to_string()),
        location: Set("Springfield".to_string()),
        image_url: Set(None),
        status: Set(status.to_string()),
        owner_id: Set(owner_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    listing.insert(db).await.expect("Failed to create listing")
}

// Helper to create a pending offer directly in the database
async fn create_test_offer(
    db: &DatabaseConnection,
    listing_id: i32,
    user_id: i32,
    amount: f64,
    status: &str,
) -> offer::Model {
    let offer = offer::ActiveModel {
        listing_id: Set(listing_id),
        user_id: Set(user_id),
        amount: Set(amount),
        message: Set(String::new()),
        status: Set(status.to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };
    offer.insert(db).await.expect("Failed to create offer")
}

fn bearer(username: &str) -> String {
    format!("Bearer {}", auth::create_jwt(username).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn get_authed(uri: &str, username: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .header("Authorization", bearer(username))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn post_json_authed(uri: &str, username: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .header("Authorization", bearer(username))
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn post_authed(uri: &str, username: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Authorization", bearer(username))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_browse_excludes_sold_listings() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Electronics", "electronics").await;

    create_test_listing(&db, alice.id, cat.id, "Active item", "active-item", 10.0, "active").await;
    create_test_listing(&db, alice.id, cat.id, "Reserved item", "reserved-item", 10.0, "reserved")
        .await;
    create_test_listing(&db, alice.id, cat.id, "Sold item", "sold-item", 10.0, "sold").await;

    let response = test_app(&db).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    let slugs: Vec<&str> = body["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"active-item"));
    assert!(slugs.contains(&"reserved-item"));
    assert!(!slugs.contains(&"sold-item"));
}

#[tokio::test]
async fn test_browse_free_text_search() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Electronics", "electronics").await;

    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let app = test_app(&db);

    let response = app.clone().oneshot(get("/?q=phone")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["listings"][0]["slug"], "old-phone");

    let response = app.oneshot(get("/?q=laptop")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_browse_matches_description_and_location() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;

    let now = chrono::Utc::now().to_rfc3339();
    listing::ActiveModel {
        title: Set("Desk".to_string()),
        slug: Set("desk".to_string()),
        description: Set("Solid oak, barely used".to_string()),
        price: Set(80.0),
        category_id: Set(cat.id),
        condition: Set("good".to_string()),
        location: Set("Rotterdam".to_string()),
        image_url: Set(None),
        status: Set("active".to_string()),
        owner_id: Set(alice.id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = test_app(&db);

    let response = app.clone().oneshot(get("/?q=oak")).await.unwrap();
    assert_eq!(json_body(response).await["total"], 1);

    let response = app.oneshot(get("/?q=rotterdam")).await.unwrap();
    assert_eq!(json_body(response).await["total"], 1);
}

#[tokio::test]
async fn test_browse_category_filter() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let electronics = create_test_category(&db, "Electronics", "electronics").await;
    let furniture = create_test_category(&db, "Furniture", "furniture").await;

    create_test_listing(&db, alice.id, electronics.id, "Phone", "phone", 50.0, "active").await;
    create_test_listing(&db, alice.id, furniture.id, "Chair", "chair", 20.0, "active").await;

    let app = test_app(&db);

    let response = app
        .clone()
        .oneshot(get("/?category=electronics"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["listings"][0]["slug"], "phone");

    // Unknown category slug filters everything out
    let response = app.oneshot(get("/?category=vehicles")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_browse_paginates_at_twelve() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;

    for i in 0..15 {
        create_test_listing(
            &db,
            alice.id,
            cat.id,
            &format!("Item {}", i),
            &format!("item-{}", i),
            10.0,
            "active",
        )
        .await;
    }

    let app = test_app(&db);

    let response = app.clone().oneshot(get("/")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 15);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["listings"].as_array().unwrap().len(), 12);

    let response = app.oneshot(get("/?page=2")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_listing_requires_auth() {
    let db = setup_test_db().await;
    let cat = create_test_category(&db, "Other", "other").await;

    let payload = serde_json::json!({
        "title": "Bike",
        "description": "A bike",
        "price": 75.0,
        "category_id": cat.id,
        "condition": "good",
        "location": "Ghent"
    });

    let response = test_app(&db)
        .oneshot(post_json("/listings/new", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/login"));

    let count = listing::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_listing_rejects_nonpositive_price() {
    let db = setup_test_db().await;
    create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;

    let app = test_app(&db);

    for price in [0.0, -5.0] {
        let payload = serde_json::json!({
            "title": "Freebie",
            "description": "Worthless",
            "price": price,
            "category_id": cat.id,
            "condition": "fair",
            "location": "Ghent"
        });

        let response = app
            .clone()
            .oneshot(post_json_authed("/listings/new", "alice", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["errors"]["price"].is_string());
    }

    let count = listing::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_listing_assigns_owner_and_slug() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Electronics", "electronics").await;

    let payload = serde_json::json!({
        "title": "Vintage Radio",
        "description": "Still hums",
        "price": 40.0,
        "category_id": cat.id,
        "condition": "fair",
        "location": "Ghent"
    });

    let response = test_app(&db)
        .oneshot(post_json_authed("/listings/new", "alice", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let saved = listing::Entity::find()
        .filter(listing::Column::Slug.eq("vintage-radio"))
        .one(&db)
        .await
        .unwrap()
        .expect("listing should be persisted");
    assert_eq!(saved.owner_id, alice.id);
    assert_eq!(saved.status, "active");
}

#[tokio::test]
async fn test_colliding_titles_get_suffixed_slugs() {
    let db = setup_test_db().await;
    create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;

    let app = test_app(&db);

    for _ in 0..3 {
        let payload = serde_json::json!({
            "title": "Garden Chair",
            "description": "Plastic, white",
            "price": 5.0,
            "category_id": cat.id,
            "condition": "good",
            "location": "Ghent"
        });
        let response = app
            .clone()
            .oneshot(post_json_authed("/listings/new", "alice", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut slugs: Vec<String> = listing::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.slug)
        .collect();
    slugs.sort();
    assert_eq!(slugs, vec!["garden-chair", "garden-chair-2", "garden-chair-3"]);
}

#[tokio::test]
async fn test_edit_listing_not_owner_is_not_found() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Lamp", "lamp", 15.0, "active").await;

    let payload = serde_json::json!({
        "title": "Hijacked",
        "description": "Hijacked",
        "price": 1.0,
        "category_id": cat.id,
        "condition": "good",
        "location": "Nowhere"
    });

    let app = test_app(&db);

    let response = app
        .clone()
        .oneshot(post_json_authed("/listings/lamp/edit", "bob", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Same for the form scaffold
    let response = app
        .oneshot(get_authed("/listings/lamp/edit", "bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let unchanged = listing::Entity::find()
        .filter(listing::Column::Slug.eq("lamp"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "Lamp");
    assert_eq!(unchanged.price, 15.0);
}

#[tokio::test]
async fn test_edit_listing_revalidates_price() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Lamp", "lamp", 15.0, "active").await;

    let payload = serde_json::json!({
        "title": "Lamp",
        "description": "A lamp",
        "price": -3.0,
        "category_id": cat.id,
        "condition": "good",
        "location": "Ghent"
    });

    let response = test_app(&db)
        .oneshot(post_json_authed("/listings/lamp/edit", "alice", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let unchanged = listing::Entity::find()
        .filter(listing::Column::Slug.eq("lamp"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.price, 15.0);
}

#[tokio::test]
async fn test_edit_listing_updates_fields_but_keeps_slug() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Lamp", "lamp", 15.0, "active").await;

    let payload = serde_json::json!({
        "title": "Reading Lamp",
        "description": "Now with a bulb",
        "price": 18.0,
        "category_id": cat.id,
        "condition": "like_new",
        "location": "Ghent",
        "status": "reserved"
    });

    let response = test_app(&db)
        .oneshot(post_json_authed("/listings/lamp/edit", "alice", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = listing::Entity::find()
        .filter(listing::Column::Slug.eq("lamp"))
        .one(&db)
        .await
        .unwrap()
        .expect("slug should be unchanged");
    assert_eq!(updated.title, "Reading Lamp");
    assert_eq!(updated.price, 18.0);
    assert_eq!(updated.status, "reserved");
}

#[tokio::test]
async fn test_listing_detail_unknown_slug_is_not_found() {
    let db = setup_test_db().await;

    let response = test_app(&db)
        .oneshot(get("/listings/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unauthenticated_offer_redirects_to_login() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let payload = serde_json::json!({ "form_type": "offer", "amount": 40.0 });

    let response = test_app(&db)
        .oneshot(post_json("/listings/old-phone", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/login?next="));
    assert!(location.contains("old-phone"));

    let count = offer::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_offer_submission_and_owner_decision() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let app = test_app(&db);

    // Bob offers 40.00
    let payload = serde_json::json!({ "form_type": "offer", "amount": 40.0, "message": "Deal?" });
    let response = app
        .clone()
        .oneshot(post_json_authed("/listings/old-phone", "bob", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let saved = offer::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(saved.status, "pending");
    assert_eq!(saved.user_id, bob.id);

    // Alice accepts
    let response = app
        .clone()
        .oneshot(post_authed(
            &format!("/offers/{}/accepted", saved.id),
            "alice",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let decided = offer::Entity::find_by_id(saved.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(decided.status, "accepted");

    // Bob is not the listing owner; his attempt changes nothing and looks
    // like a missing resource
    let response = app
        .oneshot(post_authed(
            &format!("/offers/{}/rejected", saved.id),
            "bob",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let unchanged = offer::Entity::find_by_id(saved.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, "accepted");
}

#[tokio::test]
async fn test_offer_rejects_nonpositive_amount() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let payload = serde_json::json!({ "form_type": "offer", "amount": 0.0 });
    let response = test_app(&db)
        .oneshot(post_json_authed("/listings/old-phone", "bob", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let count = offer::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_offer_transition_invalid_target_is_explicit_error() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    let listing =
        create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;
    let offer = create_test_offer(&db, listing.id, bob.id, 40.0, "pending").await;

    let app = test_app(&db);

    for target in ["pending", "haggling"] {
        let response = app
            .clone()
            .oneshot(post_authed(
                &format!("/offers/{}/{}", offer.id, target),
                "alice",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let unchanged = offer::Entity::find_by_id(offer.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, "pending");
}

#[tokio::test]
async fn test_offer_terminal_state_is_locked() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    let listing =
        create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;
    let offer = create_test_offer(&db, listing.id, bob.id, 40.0, "rejected").await;

    let response = test_app(&db)
        .oneshot(post_authed(
            &format!("/offers/{}/accepted", offer.id),
            "alice",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let unchanged = offer::Entity::find_by_id(offer.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, "rejected");
}

#[tokio::test]
async fn test_anonymous_inquiry_reaches_owner_dashboard() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let app = test_app(&db);

    let payload = serde_json::json!({
        "form_type": "inquiry",
        "name": "Bob",
        "email": "b@x.com",
        "message": "Still available?"
    });
    let response = app
        .clone()
        .oneshot(post_json("/listings/old-phone", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let saved = inquiry::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(saved.sender_id, None);
    assert_eq!(saved.name, "Bob");

    // Visible to the listing owner
    let response = app
        .oneshot(get_authed("/dashboard", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let inquiries = body["inquiries"].as_array().unwrap();
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0]["message"], "Still available?");
    assert!(inquiries[0]["sender_id"].is_null());
}

#[tokio::test]
async fn test_authenticated_inquiry_defaults_blank_fields() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let payload = serde_json::json!({
        "form_type": "inquiry",
        "message": "Does it charge?"
    });
    let response = test_app(&db)
        .oneshot(post_json_authed("/listings/old-phone", "bob", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let saved = inquiry::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(saved.sender_id, Some(bob.id));
    assert_eq!(saved.name, "bob");
    assert_eq!(saved.email, "bob@example.com");
}

#[tokio::test]
async fn test_anonymous_inquiry_requires_valid_email() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let payload = serde_json::json!({
        "form_type": "inquiry",
        "name": "Bob",
        "email": "not-an-email",
        "message": "Hello"
    });
    let response = test_app(&db)
        .oneshot(post_json("/listings/old-phone", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let count = inquiry::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_unknown_form_type_is_bad_request() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let cat = create_test_category(&db, "Other", "other").await;
    create_test_listing(&db, alice.id, cat.id, "Old Phone", "old-phone", 50.0, "active").await;

    let payload = serde_json::json!({ "form_type": "complaint" });
    let response = test_app(&db)
        .oneshot(post_json("/listings/old-phone", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_aggregates_both_offer_directions() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;
    let cat = create_test_category(&db, "Other", "other").await;

    let alices = create_test_listing(&db, alice.id, cat.id, "Lamp", "lamp", 15.0, "active").await;
    let bobs = create_test_listing(&db, bob.id, cat.id, "Desk", "desk", 90.0, "active").await;

    // Bob offers on Alice's lamp; Alice offers on Bob's desk
    create_test_offer(&db, alices.id, bob.id, 12.0, "pending").await;
    create_test_offer(&db, bobs.id, alice.id, 80.0, "pending").await;

    let response = test_app(&db)
        .oneshot(get_authed("/dashboard", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 1);
    assert_eq!(body["listings"][0]["slug"], "lamp");

    let received = body["offers_received"].as_array().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["offered_by"], "bob");
    assert_eq!(received[0]["listing_title"], "Lamp");

    let made = body["offers_made"].as_array().unwrap();
    assert_eq!(made.len(), 1);
    assert_eq!(made[0]["listing_title"], "Desk");
}

#[tokio::test]
async fn test_dashboard_creates_profile_on_first_access() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;

    let before = user_profile::Entity::find().count(&db).await.unwrap();
    assert_eq!(before, 0);

    let app = test_app(&db);

    let response = app
        .clone()
        .oneshot(get_authed("/dashboard", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let after = user_profile::Entity::find()
        .filter(user_profile::Column::UserId.eq(alice.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(after, 1);

    // Second access reuses the same row
    app.oneshot(get_authed("/dashboard", "alice")).await.unwrap();
    let again = user_profile::Entity::find().count(&db).await.unwrap();
    assert_eq!(again, 1);
}

#[tokio::test]
async fn test_profile_update_from_dashboard() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice").await;

    let payload = serde_json::json!({ "phone_number": "0470 11 22 33", "city": "Antwerp" });
    let response = test_app(&db)
        .oneshot(post_json_authed("/dashboard", "alice", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let profile = user_profile::Entity::find()
        .filter(user_profile::Column::UserId.eq(alice.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.phone_number, "0470 11 22 33");
    assert_eq!(profile.city, "Antwerp");
}

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let db = setup_test_db().await;

    let response = test_app(&db).oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/login"));
}
