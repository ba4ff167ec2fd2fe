//! User account domain model.
//!
//! The global user store consulted by the request guard and the field
//! redaction engine. Credentials and session state belong to the
//! external identity collaborator and are not modeled here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    /// Unique login name, as presented by the identity collaborator.
    pub username: String,
    pub real_name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Display name: real name when known, login name otherwise.
    pub fn display_name(&self) -> &str {
        self.real_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserAccount {
    pub username: String,
    pub real_name: Option<String>,
    pub email: String,
}
