//! SurrealDB implementation of [`RoleRepository`].

use chrono::{DateTime, Utc};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::role::{CreateRole, Role};
use hiretrack_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    permission_ids: Vec<String>,
    user_ids: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self, id: Uuid) -> Result<Role, DbError> {
        Ok(Role {
            id,
            name: self.name,
            permission_ids: parse_uuid_list(&self.permission_ids)?,
            user_ids: parse_uuid_list(&self.user_ids)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    permission_ids: Vec<String>,
    user_ids: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Role {
            id,
            name: self.name,
            permission_ids: parse_uuid_list(&self.permission_ids)?,
            user_ids: parse_uuid_list(&self.user_ids)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid_list(ids: &[String]) -> Result<Vec<Uuid>, DbError> {
    ids.iter()
        .map(|id| {
            Uuid::parse_str(id).map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))
        })
        .collect()
}

fn uuid_list_to_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, input: CreateRole) -> HireTrackResult<Role> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 name = $name, \
                 permission_ids = $permission_ids, \
                 user_ids = $user_ids",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("permission_ids", uuid_list_to_strings(&input.permission_ids)))
            .bind(("user_ids", uuid_list_to_strings(&input.user_ids)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HireTrackResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn update(&self, role: Role) -> HireTrackResult<Role> {
        let id = role.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('role', $id) SET \
                 name = $name, \
                 permission_ids = $permission_ids, \
                 user_ids = $user_ids, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", role.name))
            .bind(("permission_ids", uuid_list_to_strings(&role.permission_ids)))
            .bind(("user_ids", uuid_list_to_strings(&role.user_ids)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn delete(&self, id: Uuid) -> HireTrackResult<()> {
        self.db
            .query("DELETE type::record('role', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> HireTrackResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn roles_for_user(&self, user_id: Uuid) -> HireTrackResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE user_ids CONTAINS $user_id",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }

    async fn user_in_role(&self, user_id: Uuid, role_name: &str) -> HireTrackResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM role \
                 WHERE user_ids CONTAINS $user_id AND name = $name \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("name", role_name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        Ok(total > 0)
    }
}
