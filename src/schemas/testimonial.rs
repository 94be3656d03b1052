use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Testimonial;

#[derive(Debug, Clone, Serialize)]
pub struct TestimonialResponse {
    pub id: Uuid,
    pub author_name: String,
    pub author_role: String,
    pub author_company: String,
    pub author_initials: String,
    pub content: String,
    pub rating: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.id,
            author_name: t.author_name,
            author_role: t.author_role,
            author_company: t.author_company,
            author_initials: t.author_initials,
            content: t.content,
            rating: t.rating,
            featured: t.featured,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
