//! Idempotent bootstrap data: the admin account plus sample content from
//! `fixtures/seed.yaml`.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password_blocking, AuthError};
use crate::config::AdminConfig;
use crate::database::models::testimonial::MAX_INITIALS_LEN;
use crate::database::models::{Requirement, RequirementStatus, Service, Testimonial};
use crate::database::DatabaseError;
use crate::schemas::case_study::CaseStudyCreate;
use crate::schemas::requirement::{RequirementCreate, MAX_PROGRESS, MIN_PROGRESS};
use crate::schemas::site_content::SiteContentCreate;
use crate::schemas::{is_valid_slug, parse_payload, FieldErrors, FromPayload, Payload, SLUG_RULE};

use super::case_study_service::CaseStudyService;
use super::catalog_service::CatalogService;
use super::requirement_service::RequirementService;
use super::site_content_service::SiteContentService;
use super::user_service::UserService;

const BUILTIN_FIXTURE: &str = include_str!("../../fixtures/seed.yaml");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid seed fixture: {0}")]
    Fixture(#[from] serde_yaml::Error),

    #[error("Invalid {section} entry #{index}: {errors}")]
    Invalid {
        section: &'static str,
        index: usize,
        errors: FieldErrors,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Raw fixture sections. Entries are validated with the same schemas the
/// API uses before anything is inserted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFixture {
    pub requirements: Vec<Value>,
    pub case_studies: Vec<Value>,
    pub services: Vec<Value>,
    pub testimonials: Vec<Value>,
    pub site_content: Vec<Value>,
}

impl SeedFixture {
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_yaml(BUILTIN_FIXTURE)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Sample lead; unlike public submissions it may carry any status.
struct SeedRequirement {
    create: RequirementCreate,
    status: RequirementStatus,
    progress: i32,
}

impl FromPayload for SeedRequirement {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let create = RequirementCreate::from_payload(p);
        let status = p.optional_or("status", RequirementStatus::New);
        let progress = p.optional_or("progress", 0);
        p.check(
            "progress",
            (MIN_PROGRESS..=MAX_PROGRESS).contains(&progress),
            format!("must be between {} and {}", MIN_PROGRESS, MAX_PROGRESS),
        );
        Self {
            create,
            status,
            progress,
        }
    }
}

struct SeedService {
    slug: String,
    title: String,
    description: String,
    icon: String,
    tags: Vec<String>,
    display_order: i32,
}

impl FromPayload for SeedService {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let slug = p.required_text("slug");
        p.check("slug", is_valid_slug(&slug), SLUG_RULE);
        Self {
            slug,
            title: p.required_text("title"),
            description: p.required_text("description"),
            icon: p.required_text("icon"),
            tags: p.optional_values("tags").unwrap_or_default(),
            display_order: p.optional_or("display_order", 0),
        }
    }
}

struct SeedTestimonial {
    author_name: String,
    author_role: String,
    author_company: String,
    author_initials: String,
    content: String,
    rating: i32,
    featured: bool,
}

impl FromPayload for SeedTestimonial {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let author_initials = p.required_text("author_initials");
        p.check(
            "author_initials",
            author_initials.chars().count() <= MAX_INITIALS_LEN,
            format!("must be at most {} characters", MAX_INITIALS_LEN),
        );
        let rating = p.optional_or("rating", 5);
        p.check("rating", (1..=5).contains(&rating), "must be between 1 and 5");
        Self {
            author_name: p.required_text("author_name"),
            author_role: p.required_text("author_role"),
            author_company: p.required_text("author_company"),
            author_initials,
            content: p.required_text("content"),
            rating,
            featured: p.optional_or("featured", false),
        }
    }
}

fn parse_section<T: FromPayload>(section: &'static str, entries: &[Value]) -> Result<Vec<T>, SeedError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_payload(entry).map_err(|errors| SeedError::Invalid {
                section,
                index,
                errors,
            })
        })
        .collect()
}

/// Rows inserted by one seed run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub admin: bool,
    pub requirements: usize,
    pub case_studies: usize,
    pub services: usize,
    pub testimonials: usize,
    pub site_content: usize,
}

pub struct Seeder {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl Seeder {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Validate the whole fixture first, then insert whatever is missing.
    pub async fn run(&self, admin: &AdminConfig, fixture: &SeedFixture) -> Result<SeedReport, SeedError> {
        let requirements = parse_section::<SeedRequirement>("requirements", &fixture.requirements)?;
        let case_studies = parse_section::<CaseStudyCreate>("case_studies", &fixture.case_studies)?;
        let services = parse_section::<SeedService>("services", &fixture.services)?;
        let testimonials = parse_section::<SeedTestimonial>("testimonials", &fixture.testimonials)?;
        let site_content = parse_section::<SiteContentCreate>("site_content", &fixture.site_content)?;

        let report = SeedReport {
            admin: self.seed_admin(admin).await?,
            requirements: self.seed_requirements(requirements).await?,
            case_studies: self.seed_case_studies(case_studies).await?,
            services: self.seed_services(services).await?,
            testimonials: self.seed_testimonials(testimonials).await?,
            site_content: self.seed_site_content(site_content).await?,
        };

        info!(?report, "Seed complete");
        Ok(report)
    }

    async fn seed_admin(&self, admin: &AdminConfig) -> Result<bool, SeedError> {
        let users = UserService::new(self.pool.clone());
        if users.find_by_email(&admin.email).await?.is_some() {
            info!("Admin user already exists");
            return Ok(false);
        }

        let hash = hash_password_blocking(admin.password.clone(), self.bcrypt_cost).await?;
        users.create(&admin.email, &hash).await?;
        info!(email = %admin.email, "Admin user created");
        Ok(true)
    }

    async fn seed_requirements(&self, entries: Vec<SeedRequirement>) -> Result<usize, SeedError> {
        let service = RequirementService::new(self.pool.clone());
        if service.count().await? > 0 {
            return Ok(0);
        }

        let now = Utc::now();
        for entry in &entries {
            let c = &entry.create;
            service
                .insert(&Requirement {
                    id: Uuid::new_v4(),
                    name: c.name.clone(),
                    email: c.email.clone(),
                    company: c.company.clone(),
                    title: c.title.clone(),
                    description: c.description.clone(),
                    kind: c.kind,
                    tech_stack: c.tech_stack.clone(),
                    timeline: c.timeline.clone(),
                    status: entry.status,
                    progress: entry.progress,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        info!(inserted = entries.len(), "Seeded requirements");
        Ok(entries.len())
    }

    async fn seed_case_studies(&self, entries: Vec<CaseStudyCreate>) -> Result<usize, SeedError> {
        let service = CaseStudyService::new(self.pool.clone());
        if service.count().await? > 0 {
            return Ok(0);
        }

        let inserted = entries.len();
        let now = Utc::now();
        for entry in entries {
            service.insert(&entry.into_model(Uuid::new_v4(), now)).await?;
        }
        info!(inserted, "Seeded case studies");
        Ok(inserted)
    }

    async fn seed_services(&self, entries: Vec<SeedService>) -> Result<usize, SeedError> {
        let catalog = CatalogService::new(self.pool.clone());
        if catalog.count_services().await? > 0 {
            return Ok(0);
        }

        let inserted = entries.len();
        let now = Utc::now();
        for entry in entries {
            catalog
                .insert_service(&Service {
                    id: Uuid::new_v4(),
                    slug: entry.slug,
                    title: entry.title,
                    description: entry.description,
                    icon: entry.icon,
                    tags: Json(entry.tags),
                    display_order: entry.display_order,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        info!(inserted, "Seeded services");
        Ok(inserted)
    }

    async fn seed_testimonials(&self, entries: Vec<SeedTestimonial>) -> Result<usize, SeedError> {
        let catalog = CatalogService::new(self.pool.clone());
        if catalog.count_testimonials().await? > 0 {
            return Ok(0);
        }

        let inserted = entries.len();
        let now = Utc::now();
        for entry in entries {
            catalog
                .insert_testimonial(&Testimonial {
                    id: Uuid::new_v4(),
                    author_name: entry.author_name,
                    author_role: entry.author_role,
                    author_company: entry.author_company,
                    author_initials: entry.author_initials,
                    content: entry.content,
                    rating: entry.rating,
                    featured: entry.featured,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
        info!(inserted, "Seeded testimonials");
        Ok(inserted)
    }

    /// Unlike the other tables, site content is filled in per missing key.
    async fn seed_site_content(&self, entries: Vec<SiteContentCreate>) -> Result<usize, SeedError> {
        let service = SiteContentService::new(self.pool.clone());
        let existing = service.existing_keys().await?;

        let now = Utc::now();
        let mut inserted = 0;
        for entry in entries.into_iter().filter(|e| !existing.contains(&e.key)) {
            service.insert(&entry.into_model(Uuid::new_v4(), now)).await?;
            inserted += 1;
        }
        info!(inserted, "Seeded site content");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fixture_is_valid() {
        let fixture = SeedFixture::builtin().unwrap();
        assert!(!fixture.case_studies.is_empty());

        parse_section::<SeedRequirement>("requirements", &fixture.requirements).unwrap();
        parse_section::<CaseStudyCreate>("case_studies", &fixture.case_studies).unwrap();
        parse_section::<SeedService>("services", &fixture.services).unwrap();
        parse_section::<SeedTestimonial>("testimonials", &fixture.testimonials).unwrap();
        let content = parse_section::<SiteContentCreate>("site_content", &fixture.site_content).unwrap();

        let keys: Vec<&str> = content.iter().map(|c| c.key.as_str()).collect();
        assert!(keys.contains(&"hero_description"));
    }

    #[test]
    fn invalid_entries_name_section_and_index() {
        let fixture = SeedFixture::from_yaml(
            r#"
testimonials:
  - author_name: Ada
    author_role: CTO
    author_company: Acme
    author_initials: TOOLONG
    content: Great work
    rating: 9
"#,
        )
        .unwrap();

        let err = parse_section::<SeedTestimonial>("testimonials", &fixture.testimonials)
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Invalid testimonials entry #0: author_initials: must be at most 5 characters; \
             rating: must be between 1 and 5"
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let fixture = SeedFixture::from_yaml("services: []\n").unwrap();
        assert!(fixture.requirements.is_empty());
        assert!(fixture.site_content.is_empty());
    }
}
