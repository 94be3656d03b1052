use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Service;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            slug: service.slug,
            title: service.title,
            description: service.description,
            icon: service.icon,
            tags: service.tags.0,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}
