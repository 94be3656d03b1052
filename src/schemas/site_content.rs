use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::models::{Metadata, SiteContent};

use super::{FromPayload, Patch, Payload};

#[derive(Debug, Clone)]
pub struct SiteContentCreate {
    pub key: String,
    pub title: Option<String>,
    pub content: String,
    pub metadata: Option<Metadata>,
}

impl FromPayload for SiteContentCreate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            key: p.required_text("key"),
            title: p.optional("title"),
            content: p.required("content"),
            metadata: p.optional("metadata"),
        }
    }
}

impl SiteContentCreate {
    pub fn into_model(self, id: Uuid, now: DateTime<Utc>) -> SiteContent {
        SiteContent {
            id,
            key: self.key,
            title: self.title,
            content: self.content,
            metadata: self.metadata.map(Json),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SiteContentUpdate {
    pub key: Patch<String>,
    pub title: Patch<Option<String>>,
    pub content: Patch<String>,
    pub metadata: Patch<Option<Metadata>>,
}

impl FromPayload for SiteContentUpdate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let key: Patch<String> = p.patch("key");
        if let Some(key) = key.as_set() {
            p.check("key", !key.trim().is_empty(), "must not be empty");
        }
        Self {
            key,
            title: p.patch("title"),
            content: p.patch("content"),
            metadata: p.patch("metadata"),
        }
    }
}

impl SiteContentUpdate {
    pub fn apply(self, item: &mut SiteContent) {
        self.key.apply_to(&mut item.key);
        self.title.apply_to(&mut item.title);
        self.content.apply_to(&mut item.content);
        self.metadata.map(|m| m.map(Json)).apply_to(&mut item.metadata);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteContentResponse {
    pub id: Uuid,
    pub key: String,
    pub title: Option<String>,
    pub content: String,
    pub metadata: Option<Metadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SiteContent> for SiteContentResponse {
    fn from(item: SiteContent) -> Self {
        Self {
            id: item.id,
            key: item.key,
            title: item.title,
            content: item.content,
            metadata: item.metadata.map(|m| m.0),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::parse_payload;
    use serde_json::json;

    #[test]
    fn metadata_must_be_an_object() {
        let errors = parse_payload::<SiteContentCreate>(&json!({
            "key": "hero_description",
            "content": "We build software",
            "metadata": [1, 2]
        }))
        .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["metadata"]);
    }

    #[test]
    fn update_can_clear_title_and_metadata() {
        let mut item = parse_payload::<SiteContentCreate>(&json!({
            "key": "home_services",
            "title": "Services",
            "content": "What we do",
            "metadata": { "items": ["api", "cloud"] }
        }))
        .unwrap()
        .into_model(Uuid::nil(), Utc::now());

        parse_payload::<SiteContentUpdate>(&json!({ "title": null, "metadata": null }))
            .unwrap()
            .apply(&mut item);

        assert!(item.title.is_none());
        assert!(item.metadata.is_none());
        assert_eq!(item.key, "home_services");
        assert_eq!(item.content, "What we do");
    }

    #[test]
    fn response_exposes_metadata_document() {
        let item = parse_payload::<SiteContentCreate>(&json!({
            "key": "about",
            "content": "About us",
            "metadata": { "stats": { "years": 10 } }
        }))
        .unwrap()
        .into_model(Uuid::nil(), Utc::now());

        let value = serde_json::to_value(SiteContentResponse::from(item)).unwrap();
        assert_eq!(value["metadata"]["stats"]["years"], 10);
        assert!(value["title"].is_null());
    }
}
