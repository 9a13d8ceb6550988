//! Database-backed tests. These run against a real Postgres instance and
//! are ignored by default; set TEST_DATABASE_URL and run with
//! `cargo test -- --ignored` to exercise them.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::WayfareError;
use wayfare_domains::{Listing, ListingFilters, NewListing, PropertyType, Review, User};

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for database tests");
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

async fn make_user(pool: &PgPool) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    User::create(
        &format!("user_{suffix}"),
        "Test",
        "User",
        &format!("{suffix}@example.com"),
        pool,
    )
    .await
    .expect("create user")
}

fn sample_input() -> NewListing {
    NewListing {
        title: "Garden cottage".to_string(),
        description: "Quiet cottage with a garden".to_string(),
        property_type: PropertyType::House,
        price_per_night: Decimal::new(8500, 2),
        location: "Nairobi".to_string(),
        latitude: Some(Decimal::new(-1286389, 6)),
        longitude: Some(Decimal::new(36817223, 6)),
        max_guests: 3,
        bedrooms: 1,
        bathrooms: 1,
        amenities: "wifi,garden".to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn create_sets_both_timestamps_and_update_refreshes_one() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;

    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();
    assert_eq!(listing.created_at, listing.updated_at);
    assert!(listing.is_active);

    let mut input = sample_input();
    input.title = "Garden cottage, renovated".to_string();
    let updated = Listing::update(listing.id, &input, None, &pool).await.unwrap();

    assert_eq!(updated.created_at, listing.created_at);
    assert!(updated.updated_at > listing.updated_at);
    assert_eq!(updated.title, "Garden cottage, renovated");

    User::delete(host.id, &pool).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn create_rejects_missing_host() {
    let pool = test_pool().await;
    let err = Listing::create(&sample_input(), Uuid::new_v4(), &pool)
        .await
        .unwrap_err();
    assert!(matches!(err, WayfareError::NotFound(_)));
}

#[tokio::test]
#[ignore]
async fn second_review_by_same_reviewer_is_a_duplicate() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let guest = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();

    Review::create(listing.id, guest.id, 4, "Great stay", &pool)
        .await
        .unwrap();
    let err = Review::create(listing.id, guest.id, 5, "Changed my mind", &pool)
        .await
        .unwrap_err();
    assert!(matches!(err, WayfareError::DuplicateReview));

    // A different reviewer is still allowed.
    let other = make_user(&pool).await;
    Review::create(listing.id, other.id, 3, "It was fine", &pool)
        .await
        .unwrap();

    for user in [host, guest, other] {
        User::delete(user.id, &pool).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn out_of_range_rating_never_reaches_the_database() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let guest = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();

    for rating in [0, 6, -1] {
        let err = Review::create(listing.id, guest.id, rating, "", &pool)
            .await
            .unwrap_err();
        assert!(matches!(err, WayfareError::Validation { .. }));
    }
    assert!(Review::find_for_listing(listing.id, &pool)
        .await
        .unwrap()
        .is_empty());

    for user in [host, guest] {
        User::delete(user.id, &pool).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn deleting_a_listing_removes_its_reviews() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let guest = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();
    let review = Review::create(listing.id, guest.id, 5, "Lovely", &pool)
        .await
        .unwrap();

    Listing::delete(listing.id, &pool).await.unwrap();

    assert!(Listing::find_by_id(listing.id, &pool).await.unwrap().is_none());
    assert!(Review::find_by_id(review.id, &pool).await.unwrap().is_none());

    for user in [host, guest] {
        User::delete(user.id, &pool).await.unwrap();
    }
}

#[tokio::test]
#[ignore]
async fn deleting_a_user_cascades_to_listings_and_reviews() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let guest = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();
    let review = Review::create(listing.id, guest.id, 4, "", &pool).await.unwrap();

    User::delete(host.id, &pool).await.unwrap();

    assert!(Listing::find_by_id(listing.id, &pool).await.unwrap().is_none());
    assert!(Review::find_by_id(review.id, &pool).await.unwrap().is_none());

    User::delete(guest.id, &pool).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn filters_narrow_by_type_guests_and_search() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;

    let mut villa = sample_input();
    villa.title = format!("Seaside villa {}", host.username);
    villa.property_type = PropertyType::Villa;
    villa.max_guests = 8;
    let villa = Listing::create(&villa, host.id, &pool).await.unwrap();

    let mut flat = sample_input();
    flat.title = format!("City flat {}", host.username);
    flat.property_type = PropertyType::Apartment;
    flat.max_guests = 2;
    Listing::create(&flat, host.id, &pool).await.unwrap();

    // Search by host username scopes to this test's rows.
    let base = ListingFilters {
        search: Some(host.username.clone()),
        ..Default::default()
    };
    assert_eq!(Listing::find_filtered(&base, &pool).await.unwrap().len(), 2);

    let by_type = ListingFilters {
        property_type: Some(PropertyType::Villa),
        ..base.clone()
    };
    let found = Listing::find_filtered(&by_type, &pool).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, villa.id);

    let by_guests = ListingFilters {
        max_guests: Some(5),
        ..base.clone()
    };
    let found = Listing::find_filtered(&by_guests, &pool).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, villa.id);

    assert_eq!(Listing::count_filtered(&base, &pool).await.unwrap(), 2);

    User::delete(host.id, &pool).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn update_applies_fields_and_active_flag_together() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();

    let mut input = sample_input();
    input.title = "Garden cottage, now closed".to_string();
    // One statement: the returned row already reflects both changes.
    let updated = Listing::update(listing.id, &input, Some(false), &pool)
        .await
        .unwrap();
    assert_eq!(updated.title, "Garden cottage, now closed");
    assert!(!updated.is_active);

    // Without a supplied flag, the stored value is preserved.
    let again = Listing::update(listing.id, &input, None, &pool).await.unwrap();
    assert!(!again.is_active);

    User::delete(host.id, &pool).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn users_are_found_by_username() {
    let pool = test_pool().await;
    let user = make_user(&pool).await;

    let found = User::find_by_username(&user.username, &pool)
        .await
        .unwrap()
        .expect("user just created");
    assert_eq!(found.id, user.id);

    let missing = User::find_by_username("nobody-by-this-name", &pool)
        .await
        .unwrap();
    assert!(missing.is_none());

    User::delete(user.id, &pool).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn set_active_toggles_without_touching_other_fields() {
    let pool = test_pool().await;
    let host = make_user(&pool).await;
    let listing = Listing::create(&sample_input(), host.id, &pool).await.unwrap();

    Listing::set_active(listing.id, false, &pool).await.unwrap();
    let reloaded = Listing::find_by_id(listing.id, &pool).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
    assert_eq!(reloaded.title, listing.title);
    assert!(reloaded.updated_at > listing.updated_at);

    User::delete(host.id, &pool).await.unwrap();
}
