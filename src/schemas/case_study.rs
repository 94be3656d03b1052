use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::models::{CaseStudy, GalleryItem, Metric, Technology, Visual};

use super::{is_valid_slug, FromPayload, Patch, Payload, SLUG_RULE};

impl FromPayload for Technology {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            name: p.required("name"),
            category: p.required("category"),
        }
    }
}

impl FromPayload for Metric {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            value: p.required("value"),
            label: p.required("label"),
        }
    }
}

impl FromPayload for GalleryItem {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            url: p.required("url"),
            caption: p.required("caption"),
            kind: p.required("type"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaseStudyCreate {
    pub slug: String,
    pub title: String,
    pub role: String,
    pub description: String,
    pub industry: String,
    pub technologies: Vec<Technology>,
    pub featured: bool,
    pub metrics: Option<Vec<Metric>>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub role_description: Option<String>,
    pub key_features: Option<Vec<String>>,
    pub architecture: Option<String>,
    pub challenges: Option<String>,
    pub impact: Option<String>,
    pub gallery: Option<Vec<GalleryItem>>,
    pub visual: Visual,
    pub display_order: i32,
    pub is_active: bool,
}

impl FromPayload for CaseStudyCreate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let slug = p.required_text("slug");
        if !slug.trim().is_empty() {
            p.check("slug", is_valid_slug(&slug), SLUG_RULE);
        }

        Self {
            slug,
            title: p.required_text("title"),
            role: p.required_text("role"),
            description: p.required_text("description"),
            industry: p.required_text("industry"),
            technologies: p.optional_items("technologies").unwrap_or_default(),
            featured: p.optional_or("featured", false),
            metrics: p.optional_items("metrics"),
            problem: p.optional("problem"),
            solution: p.optional("solution"),
            role_description: p.optional("role_description"),
            key_features: p.optional_values("key_features"),
            architecture: p.optional("architecture"),
            challenges: p.optional("challenges"),
            impact: p.optional("impact"),
            gallery: p.optional_items("gallery"),
            visual: p.optional_or("visual", Visual::default()),
            display_order: p.optional_or("display_order", 0),
            is_active: p.optional_or("is_active", true),
        }
    }
}

impl CaseStudyCreate {
    pub fn into_model(self, id: Uuid, now: DateTime<Utc>) -> CaseStudy {
        CaseStudy {
            id,
            slug: self.slug,
            title: self.title,
            role: self.role,
            description: self.description,
            industry: self.industry,
            technologies: Json(self.technologies),
            featured: self.featured,
            metrics: self.metrics.map(Json),
            problem: self.problem,
            solution: self.solution,
            role_description: self.role_description,
            key_features: self.key_features.map(Json),
            architecture: self.architecture,
            challenges: self.challenges,
            impact: self.impact,
            gallery: self.gallery.map(Json),
            visual_color: self.visual.color,
            visual_icon: self.visual.icon,
            display_order: self.display_order,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. List fields replace the stored list wholesale.
#[derive(Debug, Clone, Default)]
pub struct CaseStudyUpdate {
    pub slug: Patch<String>,
    pub title: Patch<String>,
    pub role: Patch<String>,
    pub description: Patch<String>,
    pub industry: Patch<String>,
    pub technologies: Patch<Vec<Technology>>,
    pub featured: Patch<bool>,
    pub metrics: Patch<Option<Vec<Metric>>>,
    pub problem: Patch<Option<String>>,
    pub solution: Patch<Option<String>>,
    pub role_description: Patch<Option<String>>,
    pub key_features: Patch<Option<Vec<String>>>,
    pub architecture: Patch<Option<String>>,
    pub challenges: Patch<Option<String>>,
    pub impact: Patch<Option<String>>,
    pub gallery: Patch<Option<Vec<GalleryItem>>>,
    pub visual: Patch<Visual>,
    pub display_order: Patch<i32>,
    pub is_active: Patch<bool>,
}

impl FromPayload for CaseStudyUpdate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let slug: Patch<String> = p.patch("slug");
        if let Some(slug) = slug.as_set() {
            p.check("slug", is_valid_slug(slug), SLUG_RULE);
        }

        Self {
            slug,
            title: p.patch("title"),
            role: p.patch("role"),
            description: p.patch("description"),
            industry: p.patch("industry"),
            technologies: p.patch_items("technologies"),
            featured: p.patch("featured"),
            metrics: p.patch_optional_items("metrics"),
            problem: p.patch("problem"),
            solution: p.patch("solution"),
            role_description: p.patch("role_description"),
            key_features: p.patch_optional_values("key_features"),
            architecture: p.patch("architecture"),
            challenges: p.patch("challenges"),
            impact: p.patch("impact"),
            gallery: p.patch_optional_items("gallery"),
            visual: p.patch("visual"),
            display_order: p.patch("display_order"),
            is_active: p.patch("is_active"),
        }
    }
}

impl CaseStudyUpdate {
    pub fn apply(self, study: &mut CaseStudy) {
        self.slug.apply_to(&mut study.slug);
        self.title.apply_to(&mut study.title);
        self.role.apply_to(&mut study.role);
        self.description.apply_to(&mut study.description);
        self.industry.apply_to(&mut study.industry);
        self.technologies.map(Json).apply_to(&mut study.technologies);
        self.featured.apply_to(&mut study.featured);
        self.metrics.map(|m| m.map(Json)).apply_to(&mut study.metrics);
        self.problem.apply_to(&mut study.problem);
        self.solution.apply_to(&mut study.solution);
        self.role_description.apply_to(&mut study.role_description);
        self.key_features.map(|k| k.map(Json)).apply_to(&mut study.key_features);
        self.architecture.apply_to(&mut study.architecture);
        self.challenges.apply_to(&mut study.challenges);
        self.impact.apply_to(&mut study.impact);
        self.gallery.map(|g| g.map(Json)).apply_to(&mut study.gallery);
        if let Patch::Set(visual) = self.visual {
            study.set_visual(visual);
        }
        self.display_order.apply_to(&mut study.display_order);
        self.is_active.apply_to(&mut study.is_active);
    }
}

/// Public shape of a case study
#[derive(Debug, Clone, Serialize)]
pub struct CaseStudyResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub role: String,
    pub description: String,
    pub industry: String,
    pub technologies: Vec<Technology>,
    pub featured: bool,
    pub metrics: Option<Vec<Metric>>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub role_description: Option<String>,
    pub key_features: Option<Vec<String>>,
    pub architecture: Option<String>,
    pub challenges: Option<String>,
    pub impact: Option<String>,
    pub gallery: Option<Vec<GalleryItem>>,
    pub visual: Visual,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CaseStudy> for CaseStudyResponse {
    fn from(study: CaseStudy) -> Self {
        let visual = study.visual();
        Self {
            id: study.id,
            slug: study.slug,
            title: study.title,
            role: study.role,
            description: study.description,
            industry: study.industry,
            technologies: study.technologies.0,
            featured: study.featured,
            metrics: study.metrics.map(|m| m.0),
            problem: study.problem,
            solution: study.solution,
            role_description: study.role_description,
            key_features: study.key_features.map(|k| k.0),
            architecture: study.architecture,
            challenges: study.challenges,
            impact: study.impact,
            gallery: study.gallery.map(|g| g.0),
            visual,
            created_at: study.created_at,
            updated_at: study.updated_at,
        }
    }
}

/// Admin shape: the public fields plus ordering and activity state
#[derive(Debug, Clone, Serialize)]
pub struct CaseStudyAdminResponse {
    #[serde(flatten)]
    pub study: CaseStudyResponse,
    pub display_order: i32,
    pub is_active: bool,
}

impl From<CaseStudy> for CaseStudyAdminResponse {
    fn from(study: CaseStudy) -> Self {
        let display_order = study.display_order;
        let is_active = study.is_active;
        Self {
            study: study.into(),
            display_order,
            is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::parse_payload;
    use serde_json::json;

    fn sample() -> CaseStudy {
        parse_payload::<CaseStudyCreate>(&json!({
            "slug": "hit",
            "title": "HIT",
            "role": "Lead Backend Engineer",
            "description": "Clinical workflow platform",
            "industry": "Healthcare",
            "technologies": [
                { "name": "Python", "category": "backend" },
                { "name": "React", "category": "frontend" }
            ],
            "metrics": [{ "value": "60%", "label": "Faster intake" }]
        }))
        .unwrap()
        .into_model(Uuid::nil(), Utc::now())
    }

    #[test]
    fn create_applies_defaults() {
        let study = sample();
        assert!(!study.featured);
        assert!(study.is_active);
        assert_eq!(study.display_order, 0);
        assert_eq!(study.visual(), Visual::default());
        assert!(study.gallery.is_none());
    }

    #[test]
    fn create_reports_nested_item_shape() {
        let errors = parse_payload::<CaseStudyCreate>(&json!({
            "slug": "Bad Slug",
            "title": "x",
            "role": "x",
            "description": "x",
            "industry": "x",
            "technologies": [{ "name": "Rust" }, { "category": "backend" }],
            "metrics": [{ "value": "1" }],
            "key_features": ["Scheduling", 7],
            "gallery": ["not-an-object"]
        }))
        .unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "slug",
                "technologies.0.category",
                "technologies.1.name",
                "metrics.0.label",
                "key_features.1",
                "gallery.0",
            ]
        );
        let message = errors.to_string();
        assert!(message.contains("technologies.0.category: field required"), "{}", message);
        assert!(message.contains("gallery.0: must be an object"), "{}", message);
    }

    #[test]
    fn update_reports_every_bad_list_item() {
        let errors = parse_payload::<CaseStudyUpdate>(&json!({
            "technologies": [{ "name": "Rust", "category": "backend" }, { "name": 3 }],
            "gallery": [{ "url": "/uploads/a.png", "caption": "A" }]
        }))
        .unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["technologies.1.name", "technologies.1.category", "gallery.0.type"]
        );
    }

    #[test]
    fn update_replaces_lists_wholesale() {
        let mut study = sample();
        let patch = parse_payload::<CaseStudyUpdate>(&json!({
            "technologies": [{ "name": "Rust", "category": "backend" }],
            "metrics": null
        }))
        .unwrap();
        patch.apply(&mut study);

        assert_eq!(study.technologies.0, vec![Technology { name: "Rust".into(), category: "backend".into() }]);
        assert!(study.metrics.is_none());
        assert_eq!(study.title, "HIT");
    }

    #[test]
    fn update_leaves_omitted_fields() {
        let mut study = sample();
        let before = study.technologies.0.clone();
        let patch = parse_payload::<CaseStudyUpdate>(&json!({
            "title": "HIT v2",
            "visual": { "color": "accent", "icon": "heart" }
        }))
        .unwrap();
        patch.apply(&mut study);

        assert_eq!(study.title, "HIT v2");
        assert_eq!(study.visual_color, "accent");
        assert_eq!(study.visual_icon, "heart");
        assert_eq!(study.technologies.0, before);
        assert_eq!(study.metrics.as_ref().map(|m| m.0.len()), Some(1));
    }

    #[test]
    fn update_rejects_null_for_required_columns() {
        let errors = parse_payload::<CaseStudyUpdate>(&json!({ "title": null, "slug": "UPPER" })).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["slug", "title"]);
    }

    #[test]
    fn admin_response_adds_flags() {
        let value = serde_json::to_value(CaseStudyAdminResponse::from(sample())).unwrap();
        assert_eq!(value["is_active"], true);
        assert_eq!(value["display_order"], 0);
        assert_eq!(value["visual"]["color"], "primary");

        let public = serde_json::to_value(CaseStudyResponse::from(sample())).unwrap();
        assert!(public.get("is_active").is_none());
    }
}
