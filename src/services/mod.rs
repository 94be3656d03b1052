pub mod case_study_service;
pub mod catalog_service;
pub mod requirement_service;
pub mod seed_service;
pub mod site_content_service;
pub mod upload_service;
pub mod user_service;

pub use case_study_service::CaseStudyService;
pub use catalog_service::CatalogService;
pub use requirement_service::RequirementService;
pub use seed_service::{SeedError, SeedFixture, SeedReport, Seeder};
pub use site_content_service::SiteContentService;
pub use upload_service::{UploadError, UploadService};
pub use user_service::UserService;
