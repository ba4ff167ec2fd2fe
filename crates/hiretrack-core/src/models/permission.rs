//! Permission domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An (HTTP method, endpoint pattern) pair gating one API capability.
///
/// Endpoint patterns are `/`-delimited; parameterized segments carry a
/// leading `:` or are brace-wrapped (e.g. `permissions/{permId}`).
/// Permissions are global records, created and deleted only through
/// admin operations, and are never mutated once matched against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub description: String,
    /// HTTP verb this permission covers (e.g. `GET`).
    pub method: String,
    /// Endpoint path pattern (e.g. `roles/{roleId}/Users/Add/{userId}`).
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    pub description: String,
    pub method: String,
    pub endpoint: String,
}
