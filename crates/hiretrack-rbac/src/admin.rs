//! Administrative service fronts for the RBAC stores.
//!
//! Thin orchestration over the repositories, carrying the acting
//! username for audit logging. The transport layer's admin endpoints
//! call these.

use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::field_permission::{
    CreateFieldPermission, CreateFieldPermissionType, FieldPermission, FieldPermissionType,
};
use hiretrack_core::models::permission::{CreatePermission, Permission};
use hiretrack_core::repository::{
    FieldPermissionRepository, FieldPermissionTypeRepository, PermissionRepository,
};
use tracing::debug;
use uuid::Uuid;

/// Permission registry administration.
pub struct PermissionCatalog<P: PermissionRepository> {
    permissions: P,
}

impl<P: PermissionRepository> PermissionCatalog<P> {
    pub fn new(permissions: P) -> Self {
        Self { permissions }
    }

    pub async fn add(
        &self,
        input: CreatePermission,
        username: &str,
    ) -> HireTrackResult<Permission> {
        debug!(
            method = %input.method,
            endpoint = %input.endpoint,
            actor = username,
            "Creating permission"
        );
        self.permissions.create(input).await
    }

    pub async fn get(&self, permission_id: Uuid) -> HireTrackResult<Permission> {
        self.permissions.get_by_id(permission_id).await
    }

    pub async fn remove(&self, permission_id: Uuid, username: &str) -> HireTrackResult<()> {
        debug!(permission_id = %permission_id, actor = username, "Deleting permission");
        self.permissions.delete(permission_id).await
    }

    pub async fn list(&self) -> HireTrackResult<Vec<Permission>> {
        self.permissions.list().await
    }
}

/// Field permission administration.
pub struct FieldPermissionAdmin<F: FieldPermissionRepository> {
    fields: F,
}

impl<F: FieldPermissionRepository> FieldPermissionAdmin<F> {
    pub fn new(fields: F) -> Self {
        Self { fields }
    }

    pub async fn add(
        &self,
        input: CreateFieldPermission,
        username: &str,
    ) -> HireTrackResult<FieldPermission> {
        debug!(
            class = %input.class_name,
            property = %input.property_name,
            actor = username,
            "Creating field permission"
        );
        self.fields.create(input).await
    }

    pub async fn update(
        &self,
        rule: FieldPermission,
        username: &str,
    ) -> HireTrackResult<FieldPermission> {
        debug!(rule_id = %rule.id, actor = username, "Updating field permission");
        self.fields.update(rule).await
    }

    pub async fn get(&self, rule_id: Uuid) -> HireTrackResult<FieldPermission> {
        self.fields.get_by_id(rule_id).await
    }

    pub async fn remove(&self, rule_id: Uuid, username: &str) -> HireTrackResult<()> {
        debug!(rule_id = %rule_id, actor = username, "Deleting field permission");
        self.fields.delete(rule_id).await
    }

    pub async fn list(&self) -> HireTrackResult<Vec<FieldPermission>> {
        self.fields.list().await
    }

    pub async fn list_for_class(&self, class_name: &str) -> HireTrackResult<Vec<FieldPermission>> {
        self.fields.list_for_class(class_name).await
    }
}

/// Field permission type catalog administration.
pub struct FieldPermissionTypeAdmin<T: FieldPermissionTypeRepository> {
    types: T,
}

impl<T: FieldPermissionTypeRepository> FieldPermissionTypeAdmin<T> {
    pub fn new(types: T) -> Self {
        Self { types }
    }

    pub async fn add(
        &self,
        input: CreateFieldPermissionType,
        username: &str,
    ) -> HireTrackResult<FieldPermissionType> {
        debug!(type_name = %input.type_name, actor = username, "Creating field permission type");
        self.types.create(input).await
    }

    pub async fn update(
        &self,
        entry: FieldPermissionType,
        username: &str,
    ) -> HireTrackResult<FieldPermissionType> {
        debug!(entry_id = %entry.id, actor = username, "Updating field permission type");
        self.types.update(entry).await
    }

    pub async fn get(&self, entry_id: Uuid) -> HireTrackResult<FieldPermissionType> {
        self.types.get_by_id(entry_id).await
    }

    pub async fn remove(&self, entry_id: Uuid, username: &str) -> HireTrackResult<()> {
        debug!(entry_id = %entry_id, actor = username, "Deleting field permission type");
        self.types.delete(entry_id).await
    }

    pub async fn list(&self) -> HireTrackResult<Vec<FieldPermissionType>> {
        self.types.list().await
    }
}
