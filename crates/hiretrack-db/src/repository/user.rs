//! SurrealDB implementation of [`UserAccountRepository`].

use chrono::{DateTime, Utc};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::user::{CreateUserAccount, UserAccount};
use hiretrack_core::repository::UserAccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserAccountRow {
    username: String,
    real_name: Option<String>,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct UserAccountRowWithId {
    record_id: String,
    username: String,
    real_name: Option<String>,
    email: String,
    created_at: DateTime<Utc>,
}

impl UserAccountRowWithId {
    fn try_into_user(self) -> Result<UserAccount, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(UserAccount {
            id,
            username: self.username,
            real_name: self.real_name,
            email: self.email,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the UserAccount repository.
#[derive(Clone)]
pub struct SurrealUserAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserAccountRepository for SurrealUserAccountRepository<C> {
    async fn create(&self, input: CreateUserAccount) -> HireTrackResult<UserAccount> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_account', $id) SET \
                 username = $username, real_name = $real_name, \
                 email = $email",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("real_name", input.real_name))
            .bind(("email", input.email))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserAccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_account".into(),
            id: id_str,
        })?;

        Ok(UserAccount {
            id,
            username: row.username,
            real_name: row.real_name,
            email: row.email,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> HireTrackResult<UserAccount> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user_account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_account".into(),
            id: id_str,
        })?;

        Ok(UserAccount {
            id,
            username: row.username,
            real_name: row.real_name,
            email: row.email,
            created_at: row.created_at,
        })
    }

    async fn get_by_username(&self, username: &str) -> HireTrackResult<UserAccount> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_account \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_account".into(),
            id: username.to_string(),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn list(&self) -> HireTrackResult<Vec<UserAccount>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_account \
                 ORDER BY username ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAccountRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
