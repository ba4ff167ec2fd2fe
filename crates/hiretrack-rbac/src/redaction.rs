//! Field redaction engine.
//!
//! On every tracked update, rewrites properties the acting user is
//! not permitted to change. Operates on the entity's document form;
//! property names are matched case-insensitively against the
//! serialized keys.

use hiretrack_core::error::{HireTrackError, HireTrackResult};
use hiretrack_core::models::field_permission::HiddenFieldAction;
use hiretrack_core::repository::{
    FieldPermissionRepository, RoleRepository, UserAccountRepository,
};
use serde_json::Value;
use tracing::debug;

use crate::config::RedactionMode;

/// Writes performed under this username bypass field redaction
/// entirely (internal maintenance writes).
pub const SYSTEM_USERNAME: &str = "system";

pub struct FieldRedactor<F, U, R>
where
    F: FieldPermissionRepository,
    U: UserAccountRepository,
    R: RoleRepository,
{
    fields: F,
    users: U,
    roles: R,
    mode: RedactionMode,
}

impl<F, U, R> FieldRedactor<F, U, R>
where
    F: FieldPermissionRepository,
    U: UserAccountRepository,
    R: RoleRepository,
{
    pub fn new(fields: F, users: U, roles: R, mode: RedactionMode) -> Self {
        Self {
            fields,
            users,
            roles,
            mode,
        }
    }

    /// Apply the acting user's field permissions to an updated
    /// document.
    ///
    /// Rules apply when scoped to one of the user's roles, to the
    /// username directly, or to nobody (class-wide). Only rules whose
    /// class name equals `class_name` take effect. The result is
    /// idempotent: applying twice with the same inputs equals
    /// applying once.
    ///
    /// Empty tenant context and writes by the system user pass
    /// through unchanged, as do writes by principals the user store
    /// does not know.
    pub async fn apply(
        &self,
        mut new_document: Value,
        old_document: &Value,
        class_name: &str,
        tenant_id: &str,
        username: &str,
    ) -> HireTrackResult<Value> {
        if tenant_id.is_empty() || username.eq_ignore_ascii_case(SYSTEM_USERNAME) {
            return Ok(new_document);
        }

        let user = match self.users.get_by_username(username).await {
            Ok(user) => user,
            Err(HireTrackError::NotFound { .. }) => return Ok(new_document),
            Err(e) => return Err(e),
        };

        let role_names: Vec<String> = self
            .roles
            .roles_for_user(user.id)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect();

        let rules = self.fields.list_for_actor(username, &role_names).await?;

        let Some(new_map) = new_document.as_object_mut() else {
            return Ok(new_document);
        };
        let old_map = old_document.as_object();

        for rule in rules.iter().filter(|r| r.class_name == class_name) {
            let Some(key) = new_map
                .keys()
                .find(|k| k.eq_ignore_ascii_case(&rule.property_name))
                .cloned()
            else {
                continue;
            };

            let replacement = match self.mode {
                RedactionMode::RestorePrevious => old_map
                    .and_then(|map| {
                        map.iter()
                            .find(|(k, _)| k.eq_ignore_ascii_case(&rule.property_name))
                    })
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Null),
                RedactionMode::ApplyDeclaredAction => match rule.action {
                    HiddenFieldAction::Redact => Value::Null,
                    HiddenFieldAction::Substitute => {
                        Value::String(rule.substitution_text.clone().unwrap_or_default())
                    }
                },
            };

            debug!(
                class = class_name,
                property = %key,
                actor = username,
                "Field write blocked by field permission"
            );
            new_map.insert(key, replacement);
        }

        Ok(new_document)
    }
}
