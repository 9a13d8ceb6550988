//! Wire representations for the JSON API.
//!
//! Listings have two shapes: the read representation (full field set,
//! nested host and reviews, derived aggregates) and the write
//! representation (mutable business fields only; the host is never
//! client data, it comes from the authenticated caller).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wayfare_domains::{Listing, NewListing, PropertyType, ReviewWithReviewer, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub reviewer: UserView,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ReviewWithReviewer> for ReviewView {
    fn from(row: &ReviewWithReviewer) -> Self {
        Self {
            id: row.id,
            reviewer: UserView {
                id: row.reviewer_id,
                username: row.reviewer_username.clone(),
                first_name: row.reviewer_first_name.clone(),
                last_name: row.reviewer_last_name.clone(),
                email: row.reviewer_email.clone(),
            },
            rating: row.rating,
            comment: row.comment.clone(),
            created_at: row.created_at,
        }
    }
}

/// Read representation of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub price_per_night: Decimal,
    pub location: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub amenities: String,
    pub host: UserView,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviews: Vec<ReviewView>,
    pub average_rating: f64,
    pub review_count: i64,
}

/// Arithmetic mean of ratings. Zero reviews yields 0, a sentinel rather
/// than a real average: ratings are constrained to 1..=5, so 0 cannot
/// occur naturally. review_count disambiguates for clients.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|r| *r as i64).sum::<i64>() as f64 / ratings.len() as f64
}

pub fn listing_view(listing: &Listing, host: &User, reviews: &[ReviewWithReviewer]) -> ListingView {
    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
    ListingView {
        id: listing.id,
        title: listing.title.clone(),
        description: listing.description.clone(),
        property_type: listing.property_type,
        price_per_night: listing.price_per_night,
        location: listing.location.clone(),
        latitude: listing.latitude,
        longitude: listing.longitude,
        max_guests: listing.max_guests,
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        amenities: listing.amenities.clone(),
        host: UserView::from(host),
        is_active: listing.is_active,
        created_at: listing.created_at,
        updated_at: listing.updated_at,
        reviews: reviews.iter().map(ReviewView::from).collect(),
        average_rating: average_rating(&ratings),
        review_count: reviews.len() as i64,
    }
}

/// Write representation of a listing. Unknown keys in the body,
/// including any client-supplied `host`, are ignored by deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub price_per_night: Decimal,
    pub location: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[serde(default)]
    pub amenities: String,
}

impl ListingInput {
    pub fn into_new_listing(self) -> NewListing {
        NewListing {
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            price_per_night: self.price_per_night,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            max_guests: self.max_guests,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            amenities: self.amenities,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub rating: i32,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "marta".to_string(),
            first_name: "Marta".to_string(),
            last_name: "Nilsson".to_string(),
            email: "marta@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_listing(host_id: Uuid) -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::new_v4(),
            title: "Harbour loft".to_string(),
            description: "Bright loft by the water".to_string(),
            property_type: PropertyType::Apartment,
            price_per_night: Decimal::new(12050, 2),
            location: "Lisbon".to_string(),
            latitude: None,
            longitude: None,
            max_guests: 4,
            bedrooms: 2,
            bathrooms: 1,
            amenities: "wifi,kitchen".to_string(),
            host_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_review(listing_id: Uuid, rating: i32) -> ReviewWithReviewer {
        ReviewWithReviewer {
            id: Uuid::new_v4(),
            listing_id,
            rating,
            comment: "nice stay".to_string(),
            created_at: Utc::now(),
            reviewer_id: Uuid::new_v4(),
            reviewer_username: "guest".to_string(),
            reviewer_first_name: String::new(),
            reviewer_last_name: String::new(),
            reviewer_email: "guest@example.com".to_string(),
        }
    }

    #[test]
    fn average_rating_zero_when_no_reviews() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_rating_of_three_and_five_is_four() {
        assert_eq!(average_rating(&[3, 5]), 4.0);
    }

    #[test]
    fn listing_view_aggregates_reviews() {
        let host = sample_user();
        let listing = sample_listing(host.id);
        let reviews = vec![sample_review(listing.id, 3), sample_review(listing.id, 5)];

        let view = listing_view(&listing, &host, &reviews);
        assert_eq!(view.average_rating, 4.0);
        assert_eq!(view.review_count, 2);
        assert_eq!(view.host.username, "marta");
        assert_eq!(view.reviews.len(), 2);
    }

    #[test]
    fn price_serializes_as_fixed_point_string() {
        let host = sample_user();
        let listing = sample_listing(host.id);
        let view = listing_view(&listing, &host, &[]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["price_per_night"], serde_json::json!("120.50"));
        assert_eq!(json["average_rating"], serde_json::json!(0.0));
    }

    #[test]
    fn write_representation_ignores_client_host() {
        let body = serde_json::json!({
            "title": "Beach villa",
            "description": "Steps from the sand",
            "property_type": "villa",
            "price_per_night": "250.00",
            "location": "Algarve",
            "max_guests": 6,
            "bedrooms": 3,
            "bathrooms": 2,
            "amenities": "pool",
            "host": "00000000-0000-0000-0000-000000000001"
        });
        let input: ListingInput = serde_json::from_value(body).unwrap();
        let new_listing = input.into_new_listing();
        // NewListing has no host field at all; the host comes from auth.
        assert_eq!(new_listing.title, "Beach villa");
        assert_eq!(new_listing.property_type, PropertyType::Villa);
    }

    #[test]
    fn price_accepts_number_or_string() {
        let as_string: ListingInput = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "property_type": "hotel",
            "price_per_night": "99.90", "location": "x",
            "max_guests": 1, "bedrooms": 1, "bathrooms": 1
        }))
        .unwrap();
        let as_number: ListingInput = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "property_type": "hotel",
            "price_per_night": 99.90, "location": "x",
            "max_guests": 1, "bedrooms": 1, "bathrooms": 1
        }))
        .unwrap();
        assert_eq!(as_string.price_per_night, as_number.price_per_night);
    }
}
