//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::permission::Permission;

/// A named, mutable group of permission grants and user memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Ids of granted [`Permission`] records. No duplicates.
    pub permission_ids: Vec<Uuid>,
    /// Ids of member users. No duplicates.
    pub user_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// The distinguished role name whose members bypass all permission
    /// and field checks. No other role name is privileged.
    pub const SUPER_USER: &'static str = "SuperUser";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

/// A role with its permission ids and member ids resolved to full
/// records, for administrative display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetails {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Permission>,
    pub users: Vec<RoleMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMember {
    pub id: Uuid,
    /// Display name: the member's real name when known, otherwise the
    /// login username.
    pub username: String,
}
