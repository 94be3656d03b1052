use crate::database::models::{RequirementStatus, RequirementType};

use super::{is_valid_email, FromPayload, Payload};

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

/// Public lead submission
#[derive(Debug, Clone)]
pub struct RequirementCreate {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub title: String,
    pub description: String,
    pub kind: RequirementType,
    pub tech_stack: Option<String>,
    pub timeline: Option<String>,
}

impl FromPayload for RequirementCreate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let name = p.required_text("name");
        let email: String = p.required("email");
        if p.contains("email") && !email.is_empty() {
            p.check("email", is_valid_email(&email), "value is not a valid email address");
        }
        let company = p.optional("company");
        let title = p.required_text("title");
        let description = p.required_text("description");
        let kind = p.required("type");

        Self {
            name,
            email,
            company,
            title,
            description,
            kind,
            tech_stack: p.optional("tech_stack"),
            timeline: p.optional("timeline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: RequirementStatus,
}

impl FromPayload for StatusUpdate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            status: p.required("status"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub progress: i32,
}

impl FromPayload for ProgressUpdate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        let present = p.contains("progress");
        let progress: i32 = p.required("progress");
        if present {
            p.check(
                "progress",
                (MIN_PROGRESS..=MAX_PROGRESS).contains(&progress),
                format!("must be between {} and {}", MIN_PROGRESS, MAX_PROGRESS),
            );
        }
        Self { progress }
    }
}
