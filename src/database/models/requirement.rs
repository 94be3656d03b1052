use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Engagement kind requested by a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "requirementtype", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    FullTime,
    Contract,
    OneOff,
}

impl Default for RequirementType {
    fn default() -> Self {
        RequirementType::Contract
    }
}

/// Triage state of a lead. Only the admin API moves a requirement between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "requirementstatus", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    New,
    Accepted,
    InProgress,
    Completed,
    Rejected,
}

impl Default for RequirementStatus {
    fn default() -> Self {
        RequirementStatus::New
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Requirement {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: RequirementType,
    pub tech_stack: Option<String>,
    pub timeline: Option<String>,
    pub status: RequirementStatus,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_serializes_kind_as_type() {
        let now = Utc::now();
        let requirement = Requirement {
            id: Uuid::nil(),
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            company: None,
            title: "Build a REST API".into(),
            description: "...".into(),
            kind: RequirementType::OneOff,
            tech_stack: None,
            timeline: None,
            status: RequirementStatus::InProgress,
            progress: 40,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&requirement).unwrap();
        assert_eq!(value["type"], "one_off");
        assert_eq!(value["status"], "in_progress");
        assert!(value.get("kind").is_none());
        assert!(value["company"].is_null());
    }
}
