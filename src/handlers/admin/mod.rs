//! Admin tier. Every route here sits behind [`crate::middleware::require_bearer`].

pub mod case_studies;
pub mod requirements;
pub mod site_content;
pub mod uploads;
