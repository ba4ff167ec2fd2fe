//! SurrealDB implementation of [`ChangeRepository`].
//!
//! Entity snapshots are stored as JSON text columns and parsed back
//! into documents on read; the audit trail never interprets them.

use chrono::{DateTime, Utc};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::change::{Change, ChangeKind, CreateChange};
use hiretrack_core::repository::ChangeRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn kind_to_str(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Create => "Create",
        ChangeKind::Update => "Update",
        ChangeKind::Delete => "Delete",
    }
}

fn kind_from_str(value: &str) -> Result<ChangeKind, DbError> {
    match value {
        "Create" => Ok(ChangeKind::Create),
        "Update" => Ok(ChangeKind::Update),
        "Delete" => Ok(ChangeKind::Delete),
        other => Err(DbError::Migration(format!("invalid change kind: {other}"))),
    }
}

fn snapshot_to_text(snapshot: &Option<serde_json::Value>) -> Option<String> {
    snapshot.as_ref().map(|doc| doc.to_string())
}

fn snapshot_from_text(text: Option<String>) -> Result<Option<serde_json::Value>, DbError> {
    text.map(|t| {
        serde_json::from_str(&t)
            .map_err(|e| DbError::Migration(format!("invalid snapshot JSON: {e}")))
    })
    .transpose()
}

#[derive(Debug, SurrealValue)]
struct ChangeRow {
    tenant_id: String,
    entity_id: String,
    user: String,
    kind: String,
    old_entity: Option<String>,
    new_entity: Option<String>,
    changed_at: DateTime<Utc>,
}

impl ChangeRow {
    fn into_change(self, id: Uuid) -> Result<Change, DbError> {
        Ok(Change {
            id,
            tenant_id: self.tenant_id,
            entity_id: self.entity_id,
            user: self.user,
            kind: kind_from_str(&self.kind)?,
            old_entity: snapshot_from_text(self.old_entity)?,
            new_entity: snapshot_from_text(self.new_entity)?,
            changed_at: self.changed_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ChangeRowWithId {
    record_id: String,
    tenant_id: String,
    entity_id: String,
    user: String,
    kind: String,
    old_entity: Option<String>,
    new_entity: Option<String>,
    changed_at: DateTime<Utc>,
}

impl ChangeRowWithId {
    fn try_into_change(self) -> Result<Change, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Change {
            id,
            tenant_id: self.tenant_id,
            entity_id: self.entity_id,
            user: self.user,
            kind: kind_from_str(&self.kind)?,
            old_entity: snapshot_from_text(self.old_entity)?,
            new_entity: snapshot_from_text(self.new_entity)?,
            changed_at: self.changed_at,
        })
    }
}

/// SurrealDB implementation of the Change repository.
#[derive(Clone)]
pub struct SurrealChangeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealChangeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChangeRepository for SurrealChangeRepository<C> {
    async fn append(&self, input: CreateChange) -> HireTrackResult<Change> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('change', $id) SET \
                 tenant_id = $tenant_id, entity_id = $entity_id, \
                 user = $user, kind = $kind, \
                 old_entity = $old_entity, new_entity = $new_entity",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id))
            .bind(("entity_id", input.entity_id))
            .bind(("user", input.user))
            .bind(("kind", kind_to_str(input.kind)))
            .bind(("old_entity", snapshot_to_text(&input.old_entity)))
            .bind(("new_entity", snapshot_to_text(&input.new_entity)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ChangeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "change".into(),
            id: id_str,
        })?;

        Ok(row.into_change(id)?)
    }

    async fn list_for_entity(
        &self,
        tenant_id: &str,
        entity_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> HireTrackResult<Vec<Change>> {
        let mut clauses = vec!["tenant_id = $tenant_id", "entity_id = $entity_id"];
        if from.is_some() {
            clauses.push("changed_at >= $from");
        }
        if to.is_some() {
            clauses.push("changed_at <= $to");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM change WHERE {}",
            clauses.join(" AND ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("entity_id", entity_id.to_string()));

        if let Some(from) = from {
            builder = builder.bind(("from", from));
        }
        if let Some(to) = to {
            builder = builder.bind(("to", to));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ChangeRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_change())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
