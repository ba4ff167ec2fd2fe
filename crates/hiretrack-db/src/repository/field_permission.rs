//! SurrealDB implementations of [`FieldPermissionRepository`] and
//! [`FieldPermissionTypeRepository`].

use chrono::{DateTime, Utc};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::field_permission::{
    CreateFieldPermission, CreateFieldPermissionType, FieldPermission, FieldPermissionType,
    HiddenFieldAction,
};
use hiretrack_core::repository::{FieldPermissionRepository, FieldPermissionTypeRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn action_to_str(action: HiddenFieldAction) -> &'static str {
    match action {
        HiddenFieldAction::Redact => "Redact",
        HiddenFieldAction::Substitute => "Substitute",
    }
}

fn action_from_str(value: &str) -> Result<HiddenFieldAction, DbError> {
    match value {
        "Redact" => Ok(HiddenFieldAction::Redact),
        "Substitute" => Ok(HiddenFieldAction::Substitute),
        other => Err(DbError::Migration(format!("invalid action: {other}"))),
    }
}

#[derive(Debug, SurrealValue)]
struct FieldPermissionRow {
    role_name: Option<String>,
    user_name: Option<String>,
    class_name: String,
    property_name: String,
    action: String,
    substitution_text: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FieldPermissionRow {
    fn into_field_permission(self, id: Uuid) -> Result<FieldPermission, DbError> {
        Ok(FieldPermission {
            id,
            role_name: self.role_name,
            user_name: self.user_name,
            class_name: self.class_name,
            property_name: self.property_name,
            action: action_from_str(&self.action)?,
            substitution_text: self.substitution_text,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct FieldPermissionRowWithId {
    record_id: String,
    role_name: Option<String>,
    user_name: Option<String>,
    class_name: String,
    property_name: String,
    action: String,
    substitution_text: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FieldPermissionRowWithId {
    fn try_into_field_permission(self) -> Result<FieldPermission, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(FieldPermission {
            id,
            role_name: self.role_name,
            user_name: self.user_name,
            class_name: self.class_name,
            property_name: self.property_name,
            action: action_from_str(&self.action)?,
            substitution_text: self.substitution_text,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the FieldPermission repository.
#[derive(Clone)]
pub struct SurrealFieldPermissionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFieldPermissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FieldPermissionRepository for SurrealFieldPermissionRepository<C> {
    async fn create(&self, input: CreateFieldPermission) -> HireTrackResult<FieldPermission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('field_permission', $id) SET \
                 role_name = $role_name, user_name = $user_name, \
                 class_name = $class_name, \
                 property_name = $property_name, \
                 action = $action, \
                 substitution_text = $substitution_text",
            )
            .bind(("id", id_str.clone()))
            .bind(("role_name", input.role_name))
            .bind(("user_name", input.user_name))
            .bind(("class_name", input.class_name))
            .bind(("property_name", input.property_name))
            .bind(("action", action_to_str(input.action)))
            .bind(("substitution_text", input.substitution_text))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FieldPermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission".into(),
            id: id_str,
        })?;

        Ok(row.into_field_permission(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HireTrackResult<FieldPermission> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('field_permission', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission".into(),
            id: id_str,
        })?;

        Ok(row.into_field_permission(id)?)
    }

    async fn update(&self, rule: FieldPermission) -> HireTrackResult<FieldPermission> {
        let id = rule.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('field_permission', $id) SET \
                 role_name = $role_name, user_name = $user_name, \
                 class_name = $class_name, \
                 property_name = $property_name, \
                 action = $action, \
                 substitution_text = $substitution_text, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("role_name", rule.role_name))
            .bind(("user_name", rule.user_name))
            .bind(("class_name", rule.class_name))
            .bind(("property_name", rule.property_name))
            .bind(("action", action_to_str(rule.action)))
            .bind(("substitution_text", rule.substitution_text))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FieldPermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission".into(),
            id: id_str,
        })?;

        Ok(row.into_field_permission(id)?)
    }

    async fn delete(&self, id: Uuid) -> HireTrackResult<()> {
        self.db
            .query("DELETE type::record('field_permission', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> HireTrackResult<Vec<FieldPermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM field_permission \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_field_permission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_for_class(&self, class_name: &str) -> HireTrackResult<Vec<FieldPermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM field_permission \
                 WHERE class_name = $class_name",
            )
            .bind(("class_name", class_name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_field_permission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn list_for_actor(
        &self,
        username: &str,
        role_names: &[String],
    ) -> HireTrackResult<Vec<FieldPermission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM field_permission \
                 WHERE user_name = $username \
                 OR role_name IN $role_names \
                 OR (role_name = NONE AND user_name = NONE)",
            )
            .bind(("username", username.to_string()))
            .bind(("role_names", role_names.to_vec()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_field_permission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// Field permission types
// ---------------------------------------------------------------------------

#[derive(Debug, SurrealValue)]
struct FieldPermissionTypeRow {
    type_name: String,
    properties: Vec<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct FieldPermissionTypeRowWithId {
    record_id: String,
    type_name: String,
    properties: Vec<String>,
    created_at: DateTime<Utc>,
}

impl FieldPermissionTypeRowWithId {
    fn try_into_type(self) -> Result<FieldPermissionType, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(FieldPermissionType {
            id,
            type_name: self.type_name,
            properties: self.properties,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the FieldPermissionType repository.
#[derive(Clone)]
pub struct SurrealFieldPermissionTypeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFieldPermissionTypeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FieldPermissionTypeRepository for SurrealFieldPermissionTypeRepository<C> {
    async fn create(
        &self,
        input: CreateFieldPermissionType,
    ) -> HireTrackResult<FieldPermissionType> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('field_permission_type', $id) SET \
                 type_name = $type_name, properties = $properties",
            )
            .bind(("id", id_str.clone()))
            .bind(("type_name", input.type_name))
            .bind(("properties", input.properties))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FieldPermissionTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission_type".into(),
            id: id_str,
        })?;

        Ok(FieldPermissionType {
            id,
            type_name: row.type_name,
            properties: row.properties,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> HireTrackResult<FieldPermissionType> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('field_permission_type', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission_type".into(),
            id: id_str,
        })?;

        Ok(FieldPermissionType {
            id,
            type_name: row.type_name,
            properties: row.properties,
            created_at: row.created_at,
        })
    }

    async fn update(&self, entry: FieldPermissionType) -> HireTrackResult<FieldPermissionType> {
        let id = entry.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('field_permission_type', $id) SET \
                 type_name = $type_name, properties = $properties",
            )
            .bind(("id", id_str.clone()))
            .bind(("type_name", entry.type_name))
            .bind(("properties", entry.properties))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<FieldPermissionTypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "field_permission_type".into(),
            id: id_str,
        })?;

        Ok(FieldPermissionType {
            id,
            type_name: row.type_name,
            properties: row.properties,
            created_at: row.created_at,
        })
    }

    async fn delete(&self, id: Uuid) -> HireTrackResult<()> {
        self.db
            .query("DELETE type::record('field_permission_type', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> HireTrackResult<Vec<FieldPermissionType>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM \
                 field_permission_type ORDER BY type_name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FieldPermissionTypeRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_type())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
