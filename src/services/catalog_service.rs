//! Read-mostly catalog content: services and testimonials. Rows are only
//! written by the seed step.

use sqlx::PgPool;

use crate::database::models::{Service, Testimonial};
use crate::database::DatabaseError;

pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, DatabaseError> {
        let rows = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE is_active ORDER BY display_order ASC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_service_by_slug(&self, slug: &str) -> Result<Service, DatabaseError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE slug = $1 AND is_active")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Service not found".to_string()))
    }

    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, DatabaseError> {
        let rows = sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials WHERE is_active ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_services(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn count_testimonials(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn insert_service(&self, service: &Service) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO services
                (id, slug, title, description, icon, tags, display_order, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(service.id)
        .bind(&service.slug)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(&service.tags)
        .bind(service.display_order)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::on_unique_violation(e, || format!("Slug '{}' already exists", service.slug))
        })?;
        Ok(())
    }

    pub async fn insert_testimonial(&self, t: &Testimonial) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO testimonials
                (id, author_name, author_role, author_company, author_initials, content, rating,
                 featured, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(t.id)
        .bind(&t.author_name)
        .bind(&t.author_role)
        .bind(&t.author_company)
        .bind(&t.author_initials)
        .bind(&t.content)
        .bind(t.rating)
        .bind(t.featured)
        .bind(t.is_active)
        .bind(t.created_at)
        .bind(t.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
