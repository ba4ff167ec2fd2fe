//! Change audit domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// One append-only audit record per entity mutation, holding full
/// before/after snapshots rather than a diff.
///
/// A `Create` carries no old state, a `Delete` no new state, an
/// `Update` both. Records are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub id: Uuid,
    pub tenant_id: String,
    pub entity_id: String,
    /// Username of the actor that triggered the change.
    pub user: String,
    pub kind: ChangeKind,
    pub old_entity: Option<serde_json::Value>,
    pub new_entity: Option<serde_json::Value>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChange {
    pub tenant_id: String,
    pub entity_id: String,
    pub user: String,
    pub kind: ChangeKind,
    pub old_entity: Option<serde_json::Value>,
    pub new_entity: Option<serde_json::Value>,
}

/// Per-property projection of a [`Change`], computed at query time and
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeDto {
    pub entity_id: String,
    pub changed_by: String,
    pub changed_date: DateTime<Utc>,
    /// Dot-path of the property within the entity snapshot.
    pub property_name: String,
    pub previous_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
}
