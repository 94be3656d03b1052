use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::models::SiteContent;
use crate::database::DatabaseError;
use crate::schemas::site_content::{SiteContentCreate, SiteContentUpdate};

const NOT_FOUND: &str = "Site content not found";

pub const HERO_DESCRIPTION_KEY: &str = "hero_description";
pub const HERO_TAGLINE_KEY: &str = "hero_tagline";

fn key_taken(key: &str) -> String {
    format!("Key '{}' already exists", key)
}

/// Keyed marketing copy. Deletes are hard deletes.
pub struct SiteContentService {
    pool: PgPool,
}

impl SiteContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All entries ordered by key, or the single entry matching `key`.
    pub async fn list(&self, key: Option<&str>) -> Result<Vec<SiteContent>, DatabaseError> {
        let rows = match key {
            Some(key) => {
                sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content WHERE key = $1")
                    .bind(key)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content ORDER BY key ASC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<SiteContent, DatabaseError> {
        sqlx::query_as::<_, SiteContent>("SELECT * FROM site_content WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, input: SiteContentCreate) -> Result<SiteContent, DatabaseError> {
        if self.key_exists(&input.key).await? {
            return Err(DatabaseError::Conflict(key_taken(&input.key)));
        }
        let item = input.into_model(Uuid::new_v4(), Utc::now());
        self.insert(&item).await
    }

    pub async fn update(&self, id: Uuid, patch: SiteContentUpdate) -> Result<SiteContent, DatabaseError> {
        let mut item = self.get(id).await?;

        if let Some(key) = patch.key.as_set() {
            if *key != item.key && self.key_exists(key).await? {
                return Err(DatabaseError::Conflict(key_taken(key)));
            }
        }

        patch.apply(&mut item);
        let key = item.key.clone();

        sqlx::query_as::<_, SiteContent>(
            "UPDATE site_content SET key = $2, title = $3, content = $4, metadata = $5, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(item.id)
        .bind(&item.key)
        .bind(&item.title)
        .bind(&item.content)
        .bind(&item.metadata)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, || key_taken(&key)))?
        .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM site_content WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn existing_keys(&self) -> Result<HashSet<String>, DatabaseError> {
        let keys: Vec<(String,)> = sqlx::query_as("SELECT key FROM site_content")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys.into_iter().map(|(key,)| key).collect())
    }

    pub async fn insert(&self, item: &SiteContent) -> Result<SiteContent, DatabaseError> {
        sqlx::query_as::<_, SiteContent>(
            "INSERT INTO site_content (id, key, title, content, metadata, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(item.id)
        .bind(&item.key)
        .bind(&item.title)
        .bind(&item.content)
        .bind(&item.metadata)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, || key_taken(&item.key)))
    }

    /// Fold the tagline entry into the description entry's title and drop it.
    ///
    /// Returns false (and changes nothing) unless both entries exist.
    pub async fn merge_hero_entries(&self) -> Result<bool, DatabaseError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        let tagline: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT id, content FROM site_content WHERE key = $1 FOR UPDATE",
        )
        .bind(HERO_TAGLINE_KEY)
        .fetch_optional(&mut *tx)
        .await?;

        let description: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM site_content WHERE key = $1 FOR UPDATE")
                .bind(HERO_DESCRIPTION_KEY)
                .fetch_optional(&mut *tx)
                .await?;

        let (Some((tagline_id, tagline)), Some((description_id,))) = (tagline, description) else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE site_content SET title = $2, updated_at = now() WHERE id = $1")
            .bind(description_id)
            .bind(&tagline)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM site_content WHERE id = $1")
            .bind(tagline_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn key_exists(&self, key: &str) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site_content WHERE key = $1")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }
}
