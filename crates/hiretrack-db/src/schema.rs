//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Permissions (global scope)
-- =======================================================================
DEFINE TABLE permission SCHEMAFULL;
DEFINE FIELD description ON TABLE permission TYPE string;
DEFINE FIELD method ON TABLE permission TYPE string;
DEFINE FIELD endpoint ON TABLE permission TYPE string;
DEFINE FIELD created_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permission_method_endpoint ON TABLE permission \
    COLUMNS method, endpoint UNIQUE;

-- =======================================================================
-- Roles (global scope)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD permission_ids ON TABLE role TYPE array;
DEFINE FIELD permission_ids.* ON TABLE role TYPE string;
DEFINE FIELD user_ids ON TABLE role TYPE array;
DEFINE FIELD user_ids.* ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Field permissions (global scope)
-- =======================================================================
DEFINE TABLE field_permission SCHEMAFULL;
DEFINE FIELD role_name ON TABLE field_permission TYPE option<string>;
DEFINE FIELD user_name ON TABLE field_permission TYPE option<string>;
DEFINE FIELD class_name ON TABLE field_permission TYPE string;
DEFINE FIELD property_name ON TABLE field_permission TYPE string;
DEFINE FIELD action ON TABLE field_permission TYPE string \
    ASSERT $value IN ['Redact', 'Substitute'];
DEFINE FIELD substitution_text ON TABLE field_permission \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE field_permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE field_permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_field_permission_class ON TABLE field_permission \
    COLUMNS class_name;

-- =======================================================================
-- Field permission types (global scope)
-- =======================================================================
DEFINE TABLE field_permission_type SCHEMAFULL;
DEFINE FIELD type_name ON TABLE field_permission_type TYPE string;
DEFINE FIELD properties ON TABLE field_permission_type TYPE array;
DEFINE FIELD properties.* ON TABLE field_permission_type TYPE string;
DEFINE FIELD created_at ON TABLE field_permission_type TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_field_permission_type_name ON TABLE \
    field_permission_type COLUMNS type_name UNIQUE;

-- =======================================================================
-- User accounts (global scope)
-- =======================================================================
DEFINE TABLE user_account SCHEMAFULL;
DEFINE FIELD username ON TABLE user_account TYPE string;
DEFINE FIELD real_name ON TABLE user_account TYPE option<string>;
DEFINE FIELD email ON TABLE user_account TYPE string;
DEFINE FIELD created_at ON TABLE user_account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_account_username ON TABLE user_account \
    COLUMNS username UNIQUE;

-- =======================================================================
-- Changes (tenant scope, append-only)
-- =======================================================================
DEFINE TABLE change SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tenant_id ON TABLE change TYPE string;
DEFINE FIELD entity_id ON TABLE change TYPE string;
DEFINE FIELD user ON TABLE change TYPE string;
DEFINE FIELD kind ON TABLE change TYPE string \
    ASSERT $value IN ['Create', 'Update', 'Delete'];
DEFINE FIELD old_entity ON TABLE change TYPE option<string>;
DEFINE FIELD new_entity ON TABLE change TYPE option<string>;
DEFINE FIELD changed_at ON TABLE change TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_change_tenant_entity ON TABLE change \
    COLUMNS tenant_id, entity_id, changed_at;

-- =======================================================================
-- Tracked entity documents (tenant scope)
-- =======================================================================
DEFINE TABLE tracked_document SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE tracked_document TYPE string;
DEFINE FIELD collection ON TABLE tracked_document TYPE string;
DEFINE FIELD entity_id ON TABLE tracked_document TYPE string;
DEFINE FIELD payload ON TABLE tracked_document TYPE string;
DEFINE FIELD updated_at ON TABLE tracked_document TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tracked_document_key ON TABLE tracked_document \
    COLUMNS tenant_id, collection, entity_id UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
