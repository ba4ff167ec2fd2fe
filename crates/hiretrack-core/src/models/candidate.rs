//! Candidate domain model — the recruiting pipeline entity wired
//! through the tracked write path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::TrackedEntity;

/// A candidate in the recruiting pipeline.
///
/// Documents keep PascalCase property names, matching the stored
/// document shapes the audit trail and field-permission rules refer
/// to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub salary_expectation: i64,
    pub notes: String,
    #[serde(default)]
    pub skills: Vec<SkillRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillRating {
    pub skill: String,
    pub level: String,
    pub years: i32,
}

impl TrackedEntity for Candidate {
    fn class_name() -> &'static str {
        "Candidate"
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }
}
