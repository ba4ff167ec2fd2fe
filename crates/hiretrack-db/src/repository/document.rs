//! SurrealDB implementation of [`DocumentStore`].
//!
//! Tracked entity documents live in one keyed table rather than
//! per-class tables: the schema is fixed at migration time, so the
//! entity class travels in the `collection` column and the document
//! body in a JSON payload column.

use hiretrack_core::error::HireTrackResult;
use hiretrack_core::repository::DocumentStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PayloadRow {
    payload: String,
}

/// SurrealDB implementation of the tracked-document store.
#[derive(Clone)]
pub struct SurrealDocumentStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDocumentStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DocumentStore for SurrealDocumentStore<C> {
    async fn get(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
    ) -> HireTrackResult<Option<serde_json::Value>> {
        let mut result = self
            .db
            .query(
                "SELECT payload FROM tracked_document \
                 WHERE tenant_id = $tenant_id \
                 AND collection = $collection \
                 AND entity_id = $entity_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("collection", collection.to_string()))
            .bind(("entity_id", entity_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PayloadRow> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_str(&row.payload)
                    .map_err(|e| DbError::Migration(format!("invalid document JSON: {e}")).into())
            })
            .transpose()
    }

    async fn upsert(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
        document: serde_json::Value,
    ) -> HireTrackResult<()> {
        let payload = document.to_string();

        // Replace in place when the document exists; concurrent
        // writers are last-writer-wins.
        let mut result = self
            .db
            .query(
                "UPDATE tracked_document SET payload = $payload, \
                 updated_at = time::now() \
                 WHERE tenant_id = $tenant_id \
                 AND collection = $collection \
                 AND entity_id = $entity_id",
            )
            .bind(("payload", payload.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("collection", collection.to_string()))
            .bind(("entity_id", entity_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let updated: Vec<PayloadRow> = result.take(0).map_err(DbError::from)?;
        if !updated.is_empty() {
            return Ok(());
        }

        self.db
            .query(
                "CREATE type::record('tracked_document', $id) SET \
                 tenant_id = $tenant_id, collection = $collection, \
                 entity_id = $entity_id, payload = $payload",
            )
            .bind(("id", Uuid::new_v4().to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("collection", collection.to_string()))
            .bind(("entity_id", entity_id.to_string()))
            .bind(("payload", payload))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn remove(
        &self,
        tenant_id: &str,
        collection: &str,
        entity_id: &str,
    ) -> HireTrackResult<()> {
        self.db
            .query(
                "DELETE tracked_document \
                 WHERE tenant_id = $tenant_id \
                 AND collection = $collection \
                 AND entity_id = $entity_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("collection", collection.to_string()))
            .bind(("entity_id", entity_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
