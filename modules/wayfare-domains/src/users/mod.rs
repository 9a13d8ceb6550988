use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_core::{Result, WayfareError};

/// An account identity. Referenced (not owned) by listings and reviews;
/// deleting a user cascades to everything they host or authored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn create(
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (id, username, first_name, last_name, email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return WayfareError::validation("username", "already taken");
                }
            }
            WayfareError::Database(e)
        })?;

        Ok(user)
    }

    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Batch lookup for serializing a page of listings with their hosts.
    pub async fn find_by_ids(ids: &[Uuid], pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Delete a user. Their listings go via ON DELETE CASCADE, and each
    /// listing's reviews with them; reviews they authored elsewhere
    /// cascade off the reviewer FK.
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(WayfareError::NotFound(format!("user {id}")));
        }
        Ok(())
    }
}
