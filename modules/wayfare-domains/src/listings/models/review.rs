use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::{Result, WayfareError};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A guest rating and comment against a listing. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Review joined with its reviewer identity, so listing detail pages
/// never do per-row reviewer lookups.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithReviewer {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub reviewer_id: Uuid,
    pub reviewer_username: String,
    pub reviewer_first_name: String,
    pub reviewer_last_name: String,
    pub reviewer_email: String,
}

impl Review {
    /// Create a review. The rating is validated here, at the storage layer,
    /// so an out-of-range value surfaces as a validation failure.
    /// The (listing, reviewer) uniqueness is enforced by the database,
    /// so concurrent duplicate submissions lose atomically.
    pub async fn create(
        listing_id: Uuid,
        reviewer_id: Uuid,
        rating: i32,
        comment: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        validate_rating(rating)?;

        let review = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO reviews (id, listing_id, reviewer_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing_id)
        .bind(reviewer_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(map_insert_error)?;

        Ok(review)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// All reviews of a listing with reviewer rows joined in, newest first.
    pub async fn find_for_listing(
        listing_id: Uuid,
        pool: &PgPool,
    ) -> Result<Vec<ReviewWithReviewer>> {
        let rows = sqlx::query_as::<_, ReviewWithReviewer>(
            r#"
            SELECT
                r.id, r.listing_id, r.rating, r.comment, r.created_at,
                u.id as reviewer_id,
                u.username as reviewer_username,
                u.first_name as reviewer_first_name,
                u.last_name as reviewer_last_name,
                u.email as reviewer_email
            FROM reviews r
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.listing_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Reviews for a batch of listings in one query (used when serializing
    /// a page of listings without per-row lookups).
    pub async fn find_for_listings(
        listing_ids: &[Uuid],
        pool: &PgPool,
    ) -> Result<Vec<ReviewWithReviewer>> {
        let rows = sqlx::query_as::<_, ReviewWithReviewer>(
            r#"
            SELECT
                r.id, r.listing_id, r.rating, r.comment, r.created_at,
                u.id as reviewer_id,
                u.username as reviewer_username,
                u.first_name as reviewer_first_name,
                u.last_name as reviewer_last_name,
                u.email as reviewer_email
            FROM reviews r
            JOIN users u ON u.id = r.reviewer_id
            WHERE r.listing_id = ANY($1)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(listing_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(WayfareError::NotFound(format!("review {id}")));
        }
        Ok(())
    }
}

pub fn validate_rating(rating: i32) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(WayfareError::validation(
            "rating",
            format!("must be between {MIN_RATING} and {MAX_RATING}"),
        ));
    }
    Ok(())
}

fn map_insert_error(err: sqlx::Error) -> WayfareError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return WayfareError::DuplicateReview;
        }
        if db_err.is_foreign_key_violation() {
            return WayfareError::NotFound("listing or reviewer".to_string());
        }
    }
    WayfareError::Database(err)
}

/// Filters for the admin review screen.
#[derive(Debug, Clone, Default)]
pub struct ReviewAdminFilters {
    pub rating: Option<i32>,
    /// Search across listing title, reviewer username, and comment.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin list row with listing and reviewer eagerly joined.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewAdminRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub listing_title: String,
    pub reviewer_username: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewAdminRow {
    pub async fn find_filtered(filters: &ReviewAdminFilters, pool: &PgPool) -> Result<Vec<Self>> {
        let mut qb = sqlx::QueryBuilder::new(
            r#"SELECT r.id, r.listing_id, l.title as listing_title,
                      u.username as reviewer_username, r.rating, r.comment, r.created_at
               FROM reviews r
               JOIN listings l ON l.id = r.listing_id
               JOIN users u ON u.id = r.reviewer_id
               WHERE TRUE "#,
        );
        push_review_filters(&mut qb, filters);
        qb.push("ORDER BY r.created_at DESC ");

        let limit = filters.limit.unwrap_or(25);
        let offset = filters.offset.unwrap_or(0);
        qb.push("LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build_query_as::<Self>().fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn count_filtered(filters: &ReviewAdminFilters, pool: &PgPool) -> Result<i64> {
        let mut qb = sqlx::QueryBuilder::new(
            r#"SELECT COUNT(*)
               FROM reviews r
               JOIN listings l ON l.id = r.listing_id
               JOIN users u ON u.id = r.reviewer_id
               WHERE TRUE "#,
        );
        push_review_filters(&mut qb, filters);

        let row = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(row.0)
    }
}

fn push_review_filters(
    qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>,
    filters: &ReviewAdminFilters,
) {
    if let Some(rating) = filters.rating {
        qb.push("AND r.rating = ");
        qb.push_bind(rating);
        qb.push(" ");
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search.trim());
        qb.push("AND (l.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR u.username ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR r.comment ILIKE ");
        qb.push_bind(pattern);
        qb.push(") ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn rating_error_names_the_field() {
        let err = validate_rating(9).unwrap_err();
        match err {
            WayfareError::Validation { field, message } => {
                assert_eq!(field, "rating");
                assert!(message.contains("between 1 and 5"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
