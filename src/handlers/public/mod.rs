pub mod case_studies;
pub mod requirements;
pub mod services;
pub mod site_content;
pub mod testimonials;
