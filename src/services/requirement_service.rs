use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Note, Requirement, RequirementStatus};
use crate::database::DatabaseError;
use crate::schemas::requirement::RequirementCreate;

const NOT_FOUND: &str = "Requirement not found";

/// Lead intake and triage
pub struct RequirementService {
    pool: PgPool,
}

impl RequirementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new lead. Status and progress always start at `new` / 0.
    pub async fn create(&self, input: RequirementCreate) -> Result<Requirement, DatabaseError> {
        let now = Utc::now();
        let requirement = Requirement {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            company: input.company,
            title: input.title,
            description: input.description,
            kind: input.kind,
            tech_stack: input.tech_stack,
            timeline: input.timeline,
            status: RequirementStatus::New,
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        self.insert(&requirement).await
    }

    /// Insert a fully formed row (seed data may carry any status).
    pub async fn insert(&self, requirement: &Requirement) -> Result<Requirement, DatabaseError> {
        let row = sqlx::query_as::<_, Requirement>(
            "INSERT INTO requirements
                (id, name, email, company, title, description, type, tech_stack, timeline,
                 status, progress, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(requirement.id)
        .bind(&requirement.name)
        .bind(&requirement.email)
        .bind(&requirement.company)
        .bind(&requirement.title)
        .bind(&requirement.description)
        .bind(requirement.kind)
        .bind(&requirement.tech_stack)
        .bind(&requirement.timeline)
        .bind(requirement.status)
        .bind(requirement.progress)
        .bind(requirement.created_at)
        .bind(requirement.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<Requirement>, DatabaseError> {
        let rows = sqlx::query_as::<_, Requirement>(
            "SELECT * FROM requirements ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Requirement, DatabaseError> {
        sqlx::query_as::<_, Requirement>("SELECT * FROM requirements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: RequirementStatus,
    ) -> Result<Requirement, DatabaseError> {
        sqlx::query_as::<_, Requirement>(
            "UPDATE requirements SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    /// Callers validate the [0, 100] range; the table CHECK is the backstop.
    pub async fn update_progress(&self, id: Uuid, progress: i32) -> Result<Requirement, DatabaseError> {
        sqlx::query_as::<_, Requirement>(
            "UPDATE requirements SET progress = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(progress)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn add_note(&self, requirement_id: Uuid, content: &str) -> Result<Note, DatabaseError> {
        self.ensure_exists(requirement_id).await?;

        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, requirement_id, content, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(requirement_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn list_notes(&self, requirement_id: Uuid) -> Result<Vec<Note>, DatabaseError> {
        self.ensure_exists(requirement_id).await?;

        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE requirement_id = $1 ORDER BY created_at DESC",
        )
        .bind(requirement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requirements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn ensure_exists(&self, id: Uuid) -> Result<(), DatabaseError> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM requirements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(NOT_FOUND.to_string()))
    }
}
