//! SurrealDB connection management and per-tenant connection
//! resolution.

use std::collections::HashMap;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use hiretrack_core::error::{HireTrackError, HireTrackResult};

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "hiretrack".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a configuration from `HIRETRACK_DB_*` environment
    /// variables, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("HIRETRACK_DB_URL").unwrap_or(defaults.url),
            namespace: std::env::var("HIRETRACK_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: std::env::var("HIRETRACK_DB_DATABASE").unwrap_or(defaults.database),
            username: std::env::var("HIRETRACK_DB_USERNAME").unwrap_or(defaults.username),
            password: std::env::var("HIRETRACK_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root, selects the configured namespace and
    /// database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

// ---------------------------------------------------------------------------
// Per-tenant connection resolution
// ---------------------------------------------------------------------------

/// Which of a tenant's databases a connection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantDatabase {
    /// The tenant's own document database.
    Tenant,
    /// The shared global database (users, roles, permissions).
    Global,
}

/// Opaque connection information for one tenant database, resolved by
/// the external data-center collaborator.
#[derive(Debug, Clone)]
pub struct DataCenterConnection {
    pub config: DbConfig,
}

/// Maps tenants to their data-center connections.
///
/// Unknown tenants resolve to the global default so that single-tenant
/// deployments need no registry entries.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    default: DbConfig,
    tenants: HashMap<(String, TenantDatabase), DataCenterConnection>,
}

impl ConnectionRegistry {
    pub fn new(default: DbConfig) -> Self {
        Self {
            default,
            tenants: HashMap::new(),
        }
    }

    /// Register a dedicated connection for one tenant database.
    pub fn register(
        &mut self,
        tenant_id: impl Into<String>,
        kind: TenantDatabase,
        connection: DataCenterConnection,
    ) {
        self.tenants.insert((tenant_id.into(), kind), connection);
    }

    /// Resolve the connection info for a tenant database.
    pub fn resolve(
        &self,
        tenant_id: &str,
        kind: TenantDatabase,
    ) -> HireTrackResult<DataCenterConnection> {
        if tenant_id.is_empty() {
            return Err(HireTrackError::TenantContext);
        }
        Ok(self
            .tenants
            .get(&(tenant_id.to_string(), kind))
            .cloned()
            .unwrap_or_else(|| DataCenterConnection {
                config: self.default.clone(),
            }))
    }

    /// Resolve and open a connection for a tenant database.
    pub async fn connect(
        &self,
        tenant_id: &str,
        kind: TenantDatabase,
    ) -> HireTrackResult<DbManager> {
        let connection = self.resolve(tenant_id, kind)?;
        DbManager::connect(&connection.config)
            .await
            .map_err(|e| HireTrackError::Database(e.to_string()))
    }
}
