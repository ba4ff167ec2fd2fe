//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Permission, role, field
//! permission, and user records are global; change records and tracked
//! entity documents are tenant-scoped and take a `tenant_id`
//! parameter to enforce data isolation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::HireTrackResult;
use crate::models::{
    change::{Change, CreateChange},
    field_permission::{
        CreateFieldPermission, CreateFieldPermissionType, FieldPermission, FieldPermissionType,
    },
    permission::{CreatePermission, Permission},
    role::{CreateRole, Role},
    user::{CreateUserAccount, UserAccount},
};

// ---------------------------------------------------------------------------
// RBAC stores (global scope)
// ---------------------------------------------------------------------------

pub trait PermissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePermission,
    ) -> impl Future<Output = HireTrackResult<Permission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HireTrackResult<Permission>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HireTrackResult<()>> + Send;
    fn list(&self) -> impl Future<Output = HireTrackResult<Vec<Permission>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = HireTrackResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HireTrackResult<Role>> + Send;
    /// Full replacement of the role's name and id lists.
    fn update(&self, role: Role) -> impl Future<Output = HireTrackResult<Role>> + Send;
    /// Deletes the role only; grants and memberships never cascade to
    /// the referenced permissions or users.
    fn delete(&self, id: Uuid) -> impl Future<Output = HireTrackResult<()>> + Send;
    fn list(&self) -> impl Future<Output = HireTrackResult<Vec<Role>>> + Send;

    /// All roles whose member set contains the user.
    fn roles_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = HireTrackResult<Vec<Role>>> + Send;

    /// Whether the user is a member of the role with the given name.
    fn user_in_role(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> impl Future<Output = HireTrackResult<bool>> + Send;
}

pub trait FieldPermissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateFieldPermission,
    ) -> impl Future<Output = HireTrackResult<FieldPermission>> + Send;
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = HireTrackResult<FieldPermission>> + Send;
    fn update(
        &self,
        rule: FieldPermission,
    ) -> impl Future<Output = HireTrackResult<FieldPermission>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HireTrackResult<()>> + Send;
    fn list(&self) -> impl Future<Output = HireTrackResult<Vec<FieldPermission>>> + Send;

    /// All rules targeting one entity class.
    fn list_for_class(
        &self,
        class_name: &str,
    ) -> impl Future<Output = HireTrackResult<Vec<FieldPermission>>> + Send;

    /// All rules applicable to the acting user: user-scoped rules for
    /// the username, role-scoped rules for any of the given role
    /// names, and class-wide rules carrying neither scope.
    fn list_for_actor(
        &self,
        username: &str,
        role_names: &[String],
    ) -> impl Future<Output = HireTrackResult<Vec<FieldPermission>>> + Send;
}

pub trait FieldPermissionTypeRepository: Send + Sync {
    fn create(
        &self,
        input: CreateFieldPermissionType,
    ) -> impl Future<Output = HireTrackResult<FieldPermissionType>> + Send;
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = HireTrackResult<FieldPermissionType>> + Send;
    fn update(
        &self,
        entry: FieldPermissionType,
    ) -> impl Future<Output = HireTrackResult<FieldPermissionType>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HireTrackResult<()>> + Send;
    fn list(&self) -> impl Future<Output = HireTrackResult<Vec<FieldPermissionType>>> + Send;
}

pub trait UserAccountRepository: Send + Sync {
    fn create(
        &self,
        input: CreateUserAccount,
    ) -> impl Future<Output = HireTrackResult<UserAccount>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HireTrackResult<UserAccount>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = HireTrackResult<UserAccount>> + Send;
    fn list(&self) -> impl Future<Output = HireTrackResult<Vec<UserAccount>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only, tenant-scoped)
// ---------------------------------------------------------------------------

pub trait ChangeRepository: Send + Sync {
    /// Append a new change record. No update or delete operations
    /// exist.
    fn append(
        &self,
        input: CreateChange,
    ) -> impl Future<Output = HireTrackResult<Change>> + Send;

    /// Changes for one entity, optionally bounded by an inclusive date
    /// range, in underlying-store order.
    fn list_for_entity(
        &self,
        tenant_id: &str,
        entity_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> impl Future<Output = HireTrackResult<Vec<Change>>> + Send;
}

// ---------------------------------------------------------------------------
// Tracked entity documents (tenant-scoped)
// ---------------------------------------------------------------------------

/// Storage for tracked entity documents, keyed by tenant, collection
/// (entity class name), and entity id.
pub trait DocumentStore: Send + Sync {
    fn get(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
    ) -> impl Future<Output = HireTrackResult<Option<serde_json::Value>>> + Send;

    /// Insert-or-replace: concurrent writers are last-writer-wins.
    fn upsert(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
        document: serde_json::Value,
    ) -> impl Future<Output = HireTrackResult<()>> + Send;

    fn remove(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
    ) -> impl Future<Output = HireTrackResult<()>> + Send;
}
