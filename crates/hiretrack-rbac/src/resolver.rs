//! Role resolution service.
//!
//! Computes a user's effective roles and permissions, answers the
//! SuperUser check, and carries the role administration operations
//! (CRUD plus grant/membership mutations).

use std::collections::{HashMap, HashSet};

use hiretrack_core::error::{HireTrackError, HireTrackResult};
use hiretrack_core::models::permission::Permission;
use hiretrack_core::models::role::{CreateRole, Role, RoleDetails, RoleMember};
use hiretrack_core::repository::{PermissionRepository, RoleRepository, UserAccountRepository};
use tracing::debug;
use uuid::Uuid;

pub struct RoleResolver<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserAccountRepository,
{
    roles: R,
    permissions: P,
    users: U,
}

impl<R, P, U> RoleResolver<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserAccountRepository,
{
    pub fn new(roles: R, permissions: P, users: U) -> Self {
        Self {
            roles,
            permissions,
            users,
        }
    }

    // -------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------

    /// All roles in the system.
    pub async fn roles(&self) -> HireTrackResult<Vec<Role>> {
        self.roles.list().await
    }

    /// All roles whose member set contains the user.
    pub async fn roles_for_user(&self, user_id: Uuid) -> HireTrackResult<Vec<Role>> {
        self.roles.roles_for_user(user_id).await
    }

    /// Whether the user belongs to the distinguished SuperUser role.
    pub async fn is_super_user(&self, user_id: Uuid) -> HireTrackResult<bool> {
        self.roles.user_in_role(user_id, Role::SUPER_USER).await
    }

    /// The union of permissions granted by every role the user
    /// belongs to, de-duplicated by id. Grants referencing a
    /// permission that no longer exists are silently skipped.
    pub async fn permissions_for_user(&self, user_id: Uuid) -> HireTrackResult<Vec<Permission>> {
        let user_roles = self.roles.roles_for_user(user_id).await?;
        let all_permissions = self.permissions.list().await?;
        let by_id: HashMap<Uuid, &Permission> =
            all_permissions.iter().map(|p| (p.id, p)).collect();

        let mut seen = HashSet::new();
        let mut effective = Vec::new();
        for role in &user_roles {
            for permission_id in &role.permission_ids {
                let Some(permission) = by_id.get(permission_id) else {
                    continue;
                };
                if seen.insert(permission.id) {
                    effective.push((*permission).clone());
                }
            }
        }

        Ok(effective)
    }

    // -------------------------------------------------------------------
    // Role administration
    // -------------------------------------------------------------------

    pub async fn add_role(&self, input: CreateRole, username: &str) -> HireTrackResult<Role> {
        debug!(role = %input.name, actor = username, "Creating role");
        self.roles.create(input).await
    }

    pub async fn get_role(&self, role_id: Uuid) -> HireTrackResult<Role> {
        self.roles.get_by_id(role_id).await
    }

    pub async fn update_role(&self, role: Role, username: &str) -> HireTrackResult<Role> {
        debug!(role = %role.name, actor = username, "Updating role");
        self.roles.update(role).await
    }

    pub async fn delete_role(&self, role_id: Uuid, username: &str) -> HireTrackResult<()> {
        debug!(role_id = %role_id, actor = username, "Deleting role");
        self.roles.delete(role_id).await
    }

    /// The role with its permission ids and member ids resolved to
    /// full records. Members whose user record has disappeared are
    /// omitted rather than failing the lookup.
    pub async fn role_details(&self, role_id: Uuid) -> HireTrackResult<RoleDetails> {
        let role = self.roles.get_by_id(role_id).await?;
        let all_permissions = self.permissions.list().await?;
        let by_id: HashMap<Uuid, &Permission> =
            all_permissions.iter().map(|p| (p.id, p)).collect();

        let permissions = role
            .permission_ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|p| (*p).clone()))
            .collect();

        let mut users = Vec::new();
        for user_id in &role.user_ids {
            match self.users.get_by_id(*user_id).await {
                Ok(user) => users.push(RoleMember {
                    id: user.id,
                    username: user.display_name().to_string(),
                }),
                Err(HireTrackError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(RoleDetails {
            id: role.id,
            name: role.name,
            permissions,
            users,
        })
    }

    // -------------------------------------------------------------------
    // Grant and membership mutations
    // -------------------------------------------------------------------

    /// Grant a permission to a role. Granting an already-held
    /// permission is a no-op returning the role unchanged.
    pub async fn add_permission_to_role(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
        username: &str,
    ) -> HireTrackResult<Role> {
        self.permissions.get_by_id(permission_id).await?;
        let mut role = self.roles.get_by_id(role_id).await?;

        if role.permission_ids.contains(&permission_id) {
            return Ok(role);
        }

        debug!(
            role = %role.name,
            permission_id = %permission_id,
            actor = username,
            "Granting permission to role"
        );
        role.permission_ids.push(permission_id);
        self.roles.update(role).await
    }

    /// Revoke a permission from a role. Revoking a grant the role
    /// does not hold is an error.
    pub async fn remove_permission_from_role(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
        username: &str,
    ) -> HireTrackResult<Role> {
        self.permissions.get_by_id(permission_id).await?;
        let mut role = self.roles.get_by_id(role_id).await?;

        let Some(position) = role
            .permission_ids
            .iter()
            .position(|id| *id == permission_id)
        else {
            return Err(HireTrackError::NotFound {
                entity: format!("permission grant on role {}", role.name),
                id: permission_id.to_string(),
            });
        };

        debug!(
            role = %role.name,
            permission_id = %permission_id,
            actor = username,
            "Revoking permission from role"
        );
        role.permission_ids.remove(position);
        self.roles.update(role).await
    }

    /// Add a user to a role. Adding an existing member is a conflict
    /// and leaves the membership unchanged.
    pub async fn add_user_to_role(
        &self,
        role_id: Uuid,
        user_id: Uuid,
        username: &str,
    ) -> HireTrackResult<Role> {
        self.users.get_by_id(user_id).await?;
        let mut role = self.roles.get_by_id(role_id).await?;

        if role.user_ids.contains(&user_id) {
            return Err(HireTrackError::AlreadyExists {
                entity: format!("user {user_id} in role {}", role.name),
            });
        }

        debug!(
            role = %role.name,
            user_id = %user_id,
            actor = username,
            "Adding user to role"
        );
        role.user_ids.push(user_id);
        self.roles.update(role).await
    }

    /// Remove a user from a role. Removing a non-member is an error.
    pub async fn remove_user_from_role(
        &self,
        role_id: Uuid,
        user_id: Uuid,
        username: &str,
    ) -> HireTrackResult<Role> {
        self.users.get_by_id(user_id).await?;
        let mut role = self.roles.get_by_id(role_id).await?;

        let Some(position) = role.user_ids.iter().position(|id| *id == user_id) else {
            return Err(HireTrackError::NotFound {
                entity: format!("membership of role {}", role.name),
                id: user_id.to_string(),
            });
        };

        debug!(
            role = %role.name,
            user_id = %user_id,
            actor = username,
            "Removing user from role"
        );
        role.user_ids.remove(position);
        self.roles.update(role).await
    }
}
