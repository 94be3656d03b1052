use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_INITIALS_LEN: usize = 5;

#[derive(Debug, Clone, FromRow)]
pub struct Testimonial {
    pub id: Uuid,
    pub author_name: String,
    pub author_role: String,
    pub author_company: String,
    pub author_initials: String,
    pub content: String,
    pub rating: i32,
    pub featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
