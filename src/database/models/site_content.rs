use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form JSON object attached to a site content entry.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, FromRow)]
pub struct SiteContent {
    pub id: Uuid,
    pub key: String,
    pub title: Option<String>,
    pub content: String,
    pub metadata: Option<Json<Metadata>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
