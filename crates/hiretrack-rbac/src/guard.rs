//! Request authorization guard.
//!
//! Intercepts every inbound request before business logic runs. The
//! transport layer supplies the method, path, and the authenticated
//! principal; the guard answers allow-or-deny. Denied requests must
//! never be forwarded.

use hiretrack_core::error::{HireTrackError, HireTrackResult};
use hiretrack_core::repository::{PermissionRepository, RoleRepository, UserAccountRepository};
use tracing::debug;

use crate::config::RbacConfig;
use crate::matcher;
use crate::resolver::RoleResolver;

/// What the transport layer knows about an inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP verb, e.g. `GET`.
    pub method: String,
    /// Request path, query string included.
    pub path: String,
    /// Username of the authenticated principal, if any.
    pub principal: Option<String>,
    pub is_authenticated: bool,
}

/// The guard's verdict on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { status: u16, reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    fn unauthorized(path: &str) -> Self {
        Decision::Deny {
            status: 401,
            reason: format!("RBAC error: user unauthorized to access {path}"),
        }
    }
}

pub struct RequestGuard<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserAccountRepository,
{
    users: U,
    resolver: RoleResolver<R, P, U>,
    config: RbacConfig,
}

impl<R, P, U> RequestGuard<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserAccountRepository,
{
    pub fn new(users: U, resolver: RoleResolver<R, P, U>, config: RbacConfig) -> Self {
        Self {
            users,
            resolver,
            config,
        }
    }

    /// Authorize one inbound request.
    ///
    /// Anonymous requests pass through untouched; endpoint-level
    /// declarative rules are the transport layer's concern. For
    /// authenticated requests the user and role lookups complete, in
    /// order, before any verdict is produced.
    ///
    /// An empty role table allows every authenticated request,
    /// whoever the principal is: no roles means enforcement has not
    /// been configured yet, not deny-all. Once roles exist, a
    /// principal the user store does not know is rejected.
    pub async fn authorize(&self, request: &RequestContext) -> HireTrackResult<Decision> {
        if !request.is_authenticated {
            return Ok(Decision::Allow);
        }
        let Some(principal) = &request.principal else {
            return Ok(Decision::Allow);
        };

        let path = request.path.to_lowercase();

        let user = match self.users.get_by_username(principal).await {
            Ok(user) => Some(user),
            Err(HireTrackError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        let roles = self.resolver.roles().await?;
        if roles.is_empty() {
            return Ok(Decision::Allow);
        }

        let Some(user) = user else {
            debug!(principal = %principal, path = %path, "Unknown principal, rejecting");
            return Ok(Decision::unauthorized(&path));
        };

        if self.resolver.is_super_user(user.id).await? {
            return Ok(Decision::Allow);
        }

        let permissions = self.resolver.permissions_for_user(user.id).await?;
        let allowed = permissions
            .iter()
            .filter(|p| p.method == request.method)
            .any(|p| {
                matcher::endpoint_matches(&path, &p.endpoint.to_lowercase(), self.config.match_mode)
            });

        if allowed {
            Ok(Decision::Allow)
        } else {
            debug!(
                principal = %principal,
                method = %request.method,
                path = %path,
                "Request rejected"
            );
            Ok(Decision::unauthorized(&path))
        }
    }
}
