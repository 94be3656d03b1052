pub mod case_study;
pub mod requirement;
pub mod service;
pub mod site_content;
pub mod testimonial;
pub mod user;

pub use case_study::{CaseStudy, GalleryItem, Metric, Technology, Visual};
pub use requirement::{Note, Requirement, RequirementStatus, RequirementType};
pub use service::Service;
pub use site_content::{Metadata, SiteContent};
pub use testimonial::Testimonial;
pub use user::User;
