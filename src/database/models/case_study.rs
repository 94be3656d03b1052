use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    pub caption: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Card styling used by the portfolio front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub color: String,
    pub icon: String,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            color: "primary".to_string(),
            icon: "code".to_string(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CaseStudy {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub role: String,
    pub description: String,
    pub industry: String,
    pub technologies: Json<Vec<Technology>>,
    pub featured: bool,
    pub metrics: Option<Json<Vec<Metric>>>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub role_description: Option<String>,
    pub key_features: Option<Json<Vec<String>>>,
    pub architecture: Option<String>,
    pub challenges: Option<String>,
    pub impact: Option<String>,
    pub gallery: Option<Json<Vec<GalleryItem>>>,
    pub visual_color: String,
    pub visual_icon: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaseStudy {
    pub fn visual(&self) -> Visual {
        Visual {
            color: self.visual_color.clone(),
            icon: self.visual_icon.clone(),
        }
    }

    pub fn set_visual(&mut self, visual: Visual) {
        self.visual_color = visual.color;
        self.visual_icon = visual.icon;
    }
}
