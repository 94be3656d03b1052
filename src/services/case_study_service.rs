use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::CaseStudy;
use crate::database::DatabaseError;
use crate::schemas::case_study::{CaseStudyCreate, CaseStudyUpdate};

const NOT_FOUND: &str = "Case study not found";

fn slug_taken(slug: &str) -> String {
    format!("Slug '{}' already exists", slug)
}

/// Portfolio case studies. Deletion is a soft delete via `is_active`.
pub struct CaseStudyService {
    pool: PgPool,
}

impl CaseStudyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<CaseStudy>, DatabaseError> {
        let rows = sqlx::query_as::<_, CaseStudy>(
            "SELECT * FROM case_studies WHERE is_active
             ORDER BY display_order ASC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_active_by_slug(&self, slug: &str) -> Result<CaseStudy, DatabaseError> {
        sqlx::query_as::<_, CaseStudy>("SELECT * FROM case_studies WHERE slug = $1 AND is_active")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    /// Every row regardless of activity state
    pub async fn list_all(&self) -> Result<Vec<CaseStudy>, DatabaseError> {
        let rows = sqlx::query_as::<_, CaseStudy>(
            "SELECT * FROM case_studies ORDER BY display_order ASC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<CaseStudy, DatabaseError> {
        sqlx::query_as::<_, CaseStudy>("SELECT * FROM case_studies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    /// Slugs stay reserved by soft-deleted rows too.
    pub async fn create(&self, input: CaseStudyCreate) -> Result<CaseStudy, DatabaseError> {
        if self.slug_exists(&input.slug).await? {
            return Err(DatabaseError::Conflict(slug_taken(&input.slug)));
        }
        let study = input.into_model(Uuid::new_v4(), Utc::now());
        self.insert(&study).await
    }

    pub async fn update(&self, id: Uuid, patch: CaseStudyUpdate) -> Result<CaseStudy, DatabaseError> {
        let mut study = self.get(id).await?;

        if let Some(slug) = patch.slug.as_set() {
            if *slug != study.slug && self.slug_exists(slug).await? {
                return Err(DatabaseError::Conflict(slug_taken(slug)));
            }
        }

        patch.apply(&mut study);
        let slug = study.slug.clone();

        sqlx::query_as::<_, CaseStudy>(
            "UPDATE case_studies SET
                slug = $2, title = $3, role = $4, description = $5, industry = $6,
                technologies = $7, featured = $8, metrics = $9, problem = $10, solution = $11,
                role_description = $12, key_features = $13, architecture = $14, challenges = $15,
                impact = $16, gallery = $17, visual_color = $18, visual_icon = $19,
                display_order = $20, is_active = $21, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(study.id)
        .bind(&study.slug)
        .bind(&study.title)
        .bind(&study.role)
        .bind(&study.description)
        .bind(&study.industry)
        .bind(&study.technologies)
        .bind(study.featured)
        .bind(&study.metrics)
        .bind(&study.problem)
        .bind(&study.solution)
        .bind(&study.role_description)
        .bind(&study.key_features)
        .bind(&study.architecture)
        .bind(&study.challenges)
        .bind(&study.impact)
        .bind(&study.gallery)
        .bind(&study.visual_color)
        .bind(&study.visual_icon)
        .bind(study.display_order)
        .bind(study.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, || slug_taken(&slug)))?
        .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    /// Flag the row inactive. Repeating the call is harmless.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE case_studies SET is_active = false, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM case_studies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn insert(&self, study: &CaseStudy) -> Result<CaseStudy, DatabaseError> {
        sqlx::query_as::<_, CaseStudy>(
            "INSERT INTO case_studies
                (id, slug, title, role, description, industry, technologies, featured, metrics,
                 problem, solution, role_description, key_features, architecture, challenges,
                 impact, gallery, visual_color, visual_icon, display_order, is_active,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23)
             RETURNING *",
        )
        .bind(study.id)
        .bind(&study.slug)
        .bind(&study.title)
        .bind(&study.role)
        .bind(&study.description)
        .bind(&study.industry)
        .bind(&study.technologies)
        .bind(study.featured)
        .bind(&study.metrics)
        .bind(&study.problem)
        .bind(&study.solution)
        .bind(&study.role_description)
        .bind(&study.key_features)
        .bind(&study.architecture)
        .bind(&study.challenges)
        .bind(&study.impact)
        .bind(&study.gallery)
        .bind(&study.visual_color)
        .bind(&study.visual_icon)
        .bind(study.display_order)
        .bind(study.is_active)
        .bind(study.created_at)
        .bind(study.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::on_unique_violation(e, || slug_taken(&study.slug)))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM case_studies WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }
}
