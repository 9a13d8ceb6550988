use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::{Result, WayfareError};

/// Kind of bookable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
pub enum PropertyType {
    Hotel,
    Apartment,
    House,
    Villa,
    Resort,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Hotel,
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Villa,
        PropertyType::Resort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Hotel => "hotel",
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Resort => "resort",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyType {
    type Err = WayfareError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hotel" => Ok(PropertyType::Hotel),
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "villa" => Ok(PropertyType::Villa),
            "resort" => Ok(PropertyType::Resort),
            other => Err(WayfareError::validation(
                "property_type",
                format!("unknown property type: {other}"),
            )),
        }
    }
}

/// A bookable property record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
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
    pub host_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable business fields for creating or updating a listing.
/// The host is always passed separately, never part of client input.
#[derive(Debug, Clone)]
pub struct NewListing {
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
}

/// Filter parameters for listing queries.
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub property_type: Option<PropertyType>,
    pub is_active: Option<bool>,
    pub max_guests: Option<i32>,
    pub created_after: Option<DateTime<Utc>>,
    /// Free-text search across title, location, description, and host username.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Listing {
    pub async fn create(input: &NewListing, host_id: Uuid, pool: &PgPool) -> Result<Self> {
        validate_counts(input)?;
        let now = Utc::now();

        let listing = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO listings
                (id, title, description, property_type, price_per_night, location,
                 latitude, longitude, max_guests, bedrooms, bathrooms, amenities,
                 host_id, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, TRUE, $14, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.property_type)
        .bind(input.price_per_night)
        .bind(&input.location)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.max_guests)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(&input.amenities)
        .bind(host_id)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(map_host_fk)?;

        Ok(listing)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Dynamic filtered query; newest-created first.
    pub async fn find_filtered(filters: &ListingFilters, pool: &PgPool) -> Result<Vec<Self>> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT l.* FROM listings l JOIN users u ON u.id = l.host_id WHERE TRUE ",
        );
        push_listing_filters(&mut qb, filters);
        qb.push("ORDER BY l.created_at DESC ");

        let limit = filters.limit.unwrap_or(50);
        let offset = filters.offset.unwrap_or(0);
        qb.push("LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build_query_as::<Self>().fetch_all(pool).await?;
        Ok(rows)
    }

    /// Count matching listings (for page math in the admin screens).
    pub async fn count_filtered(filters: &ListingFilters, pool: &PgPool) -> Result<i64> {
        let mut qb = sqlx::QueryBuilder::new(
            "SELECT COUNT(*) FROM listings l JOIN users u ON u.id = l.host_id WHERE TRUE ",
        );
        push_listing_filters(&mut qb, filters);

        let row = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(row.0)
    }

    /// Update the mutable business fields in one statement. The active
    /// flag changes only when a new value is supplied (the API never
    /// sets it; the admin edit form does). Refreshes updated_at;
    /// created_at never changes after creation.
    pub async fn update(
        id: Uuid,
        input: &NewListing,
        is_active: Option<bool>,
        pool: &PgPool,
    ) -> Result<Self> {
        validate_counts(input)?;

        let row = sqlx::query_as::<_, Self>(
            r#"
            UPDATE listings SET
                title = $2, description = $3, property_type = $4, price_per_night = $5,
                location = $6, latitude = $7, longitude = $8, max_guests = $9,
                bedrooms = $10, bathrooms = $11, amenities = $12,
                is_active = COALESCE($13, is_active), updated_at = $14
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.property_type)
        .bind(input.price_per_night)
        .bind(&input.location)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.max_guests)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(&input.amenities)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        row.ok_or_else(|| WayfareError::NotFound(format!("listing {id}")))
    }

    /// Inline activation toggle from the admin list view.
    pub async fn set_active(id: Uuid, is_active: bool, pool: &PgPool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE listings SET is_active = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(WayfareError::NotFound(format!("listing {id}")));
        }
        Ok(())
    }

    /// Delete a listing. Its reviews go with it (ON DELETE CASCADE).
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(WayfareError::NotFound(format!("listing {id}")));
        }
        Ok(())
    }
}

fn push_listing_filters(qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, filters: &ListingFilters) {
    if let Some(property_type) = filters.property_type {
        qb.push("AND l.property_type = ");
        qb.push_bind(property_type);
        qb.push(" ");
    }
    if let Some(is_active) = filters.is_active {
        qb.push("AND l.is_active = ");
        qb.push_bind(is_active);
        qb.push(" ");
    }
    if let Some(max_guests) = filters.max_guests {
        qb.push("AND l.max_guests >= ");
        qb.push_bind(max_guests);
        qb.push(" ");
    }
    if let Some(created_after) = filters.created_after {
        qb.push("AND l.created_at >= ");
        qb.push_bind(created_after);
        qb.push(" ");
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search.trim());
        qb.push("AND (l.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.location ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR l.description ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR u.username ILIKE ");
        qb.push_bind(pattern);
        qb.push(") ");
    }
}

/// Counts are non-negative by domain; the database CHECK backs this up,
/// but a friendly validation error beats a constraint violation.
fn validate_counts(input: &NewListing) -> Result<()> {
    for (field, value) in [
        ("max_guests", input.max_guests),
        ("bedrooms", input.bedrooms),
        ("bathrooms", input.bathrooms),
    ] {
        if value < 0 {
            return Err(WayfareError::validation(field, "must be non-negative"));
        }
    }
    Ok(())
}

fn map_host_fk(err: sqlx::Error) -> WayfareError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_foreign_key_violation() {
            return WayfareError::NotFound("host user".to_string());
        }
    }
    WayfareError::Database(err)
}

/// Admin list row with the host username eagerly joined.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingAdminRow {
    pub id: Uuid,
    pub title: String,
    pub property_type: PropertyType,
    pub location: String,
    pub price_per_night: Decimal,
    pub max_guests: i32,
    pub host_username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ListingAdminRow {
    pub async fn find_filtered(filters: &ListingFilters, pool: &PgPool) -> Result<Vec<Self>> {
        let mut qb = sqlx::QueryBuilder::new(
            r#"SELECT l.id, l.title, l.property_type, l.location, l.price_per_night,
                      l.max_guests, u.username as host_username, l.is_active, l.created_at
               FROM listings l
               JOIN users u ON u.id = l.host_id
               WHERE TRUE "#,
        );
        push_listing_filters(&mut qb, filters);
        qb.push("ORDER BY l.created_at DESC ");

        let limit = filters.limit.unwrap_or(25);
        let offset = filters.offset.unwrap_or(0);
        qb.push("LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build_query_as::<Self>().fetch_all(pool).await?;
        Ok(rows)
    }
}

/// Stats for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ListingStats {
    pub total_listings: i64,
    pub active_listings: i64,
    pub total_reviews: i64,
    pub total_users: i64,
    pub listings_by_type: Vec<PropertyTypeCount>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PropertyTypeCount {
    pub property_type: PropertyType,
    pub count: i64,
}

impl ListingStats {
    pub async fn compute(pool: &PgPool) -> Result<Self> {
        let total_listings = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM listings")
            .fetch_one(pool)
            .await?
            .0;

        let active_listings =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM listings WHERE is_active")
                .fetch_one(pool)
                .await?
                .0;

        let total_reviews = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await?
            .0;

        let total_users = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?
            .0;

        let listings_by_type = sqlx::query_as::<_, PropertyTypeCount>(
            r#"
            SELECT property_type, COUNT(*) as count
            FROM listings
            GROUP BY property_type
            ORDER BY count DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(Self {
            total_listings,
            active_listings,
            total_reviews,
            total_users,
            listings_by_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn property_type_roundtrip() {
        for pt in PropertyType::ALL {
            assert_eq!(PropertyType::from_str(pt.as_str()).unwrap(), pt);
        }
    }

    #[test]
    fn property_type_rejects_unknown() {
        assert!(PropertyType::from_str("castle").is_err());
    }

    #[test]
    fn property_type_serializes_lowercase() {
        let json = serde_json::to_string(&PropertyType::Villa).unwrap();
        assert_eq!(json, "\"villa\"");
    }

    #[test]
    fn negative_counts_rejected() {
        let input = NewListing {
            title: "t".into(),
            description: "d".into(),
            property_type: PropertyType::Hotel,
            price_per_night: Decimal::new(10000, 2),
            location: "x".into(),
            latitude: None,
            longitude: None,
            max_guests: 2,
            bedrooms: -1,
            bathrooms: 1,
            amenities: String::new(),
        };
        let err = validate_counts(&input).unwrap_err();
        match err {
            WayfareError::Validation { field, .. } => assert_eq!(field, "bedrooms"),
            other => panic!("expected validation error, got {other}"),
        }
    }
}
