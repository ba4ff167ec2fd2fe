//! Field-level permission domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happens to a property the acting user may not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenFieldAction {
    /// Clear the property.
    Redact,
    /// Replace the property with the configured substitution text.
    Substitute,
}

/// A rule restricting which users or roles may alter one property of
/// one entity class.
///
/// A rule applies to a write when its `role_name` matches one of the
/// actor's roles, when its `user_name` equals the acting username, or
/// when both scopes are absent (a class-wide rule). `class_name`
/// equality gates application; `property_name` is matched
/// case-insensitively against the entity's serialized properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPermission {
    pub id: Uuid,
    pub role_name: Option<String>,
    pub user_name: Option<String>,
    pub class_name: String,
    pub property_name: String,
    pub action: HiddenFieldAction,
    pub substitution_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFieldPermission {
    pub role_name: Option<String>,
    pub user_name: Option<String>,
    pub class_name: String,
    pub property_name: String,
    pub action: HiddenFieldAction,
    pub substitution_text: Option<String>,
}

/// Catalog entry listing the redactable properties of one entity
/// class, consumed by administrative tooling when authoring
/// [`FieldPermission`] rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPermissionType {
    pub id: Uuid,
    pub type_name: String,
    pub properties: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFieldPermissionType {
    pub type_name: String,
    #[serde(default)]
    pub properties: Vec<String>,
}
