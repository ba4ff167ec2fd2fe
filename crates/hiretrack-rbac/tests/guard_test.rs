//! Integration tests for the request authorization guard using
//! in-memory SurrealDB.

use hiretrack_core::models::permission::CreatePermission;
use hiretrack_core::models::role::{CreateRole, Role};
use hiretrack_core::models::user::{CreateUserAccount, UserAccount};
use hiretrack_core::repository::{PermissionRepository, RoleRepository, UserAccountRepository};
use hiretrack_db::repository::{
    SurrealPermissionRepository, SurrealRoleRepository, SurrealUserAccountRepository,
};
use hiretrack_rbac::{Decision, MatchMode, RbacConfig, RequestContext, RequestGuard, RoleResolver};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;
type Guard = RequestGuard<
    SurrealRoleRepository<Db>,
    SurrealPermissionRepository<Db>,
    SurrealUserAccountRepository<Db>,
>;

fn build_guard(db: &Surreal<Db>, config: RbacConfig) -> Guard {
    let resolver = RoleResolver::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealPermissionRepository::new(db.clone()),
        SurrealUserAccountRepository::new(db.clone()),
    );
    RequestGuard::new(SurrealUserAccountRepository::new(db.clone()), resolver, config)
}

/// Helper: in-memory DB, migrations, guard, one user account.
async fn setup() -> (Surreal<Db>, Guard, UserAccount) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hiretrack_db::run_migrations(&db).await.unwrap();

    let user = SurrealUserAccountRepository::new(db.clone())
        .create(CreateUserAccount {
            username: "alice".into(),
            real_name: None,
            email: "alice@example.com".into(),
        })
        .await
        .unwrap();

    let guard = build_guard(&db, RbacConfig::default());
    (db, guard, user)
}

async fn grant_permission(
    db: &Surreal<Db>,
    role_name: &str,
    user_id: Uuid,
    method: &str,
    endpoint: &str,
) {
    let perm = SurrealPermissionRepository::new(db.clone())
        .create(CreatePermission {
            description: format!("{method} {endpoint}"),
            method: method.into(),
            endpoint: endpoint.into(),
        })
        .await
        .unwrap();

    SurrealRoleRepository::new(db.clone())
        .create(CreateRole {
            name: role_name.into(),
            permission_ids: vec![perm.id],
            user_ids: vec![user_id],
        })
        .await
        .unwrap();
}

fn request(method: &str, path: &str, principal: Option<&str>) -> RequestContext {
    RequestContext {
        method: method.into(),
        path: path.into(),
        principal: principal.map(String::from),
        is_authenticated: principal.is_some(),
    }
}

#[tokio::test]
async fn anonymous_requests_pass_through() {
    let (_db, guard, _user) = setup().await;

    let decision = guard
        .authorize(&request("GET", "skills", None))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn fail_open_with_no_roles_in_the_system() {
    let (_db, guard, _user) = setup().await;

    // No role records exist at all: every authenticated request is
    // allowed.
    let decision = guard
        .authorize(&request("DELETE", "anything/at/all", Some("alice")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn fail_open_applies_to_unknown_principals_too() {
    let (_db, guard, _user) = setup().await;

    let decision = guard
        .authorize(&request("GET", "skills", Some("mallory")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn parameterized_segments_match_any_value() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "skill-readers", user.id, "GET", "skills/{skillId}").await;

    let decision = guard
        .authorize(&request("GET", "skills/5f3", Some("alice")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);

    let decision = guard
        .authorize(&request("GET", "skills/anything-else", Some("alice")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn segment_count_mismatch_is_rejected() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "skill-adders", user.id, "GET", "skills/{id}/AddSkill").await;

    let decision = guard
        .authorize(&request("GET", "skills/5f3", Some("alice")))
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn mixed_case_paths_are_normalized_before_matching() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "role-admins", user.id, "GET", "roles/Users/{userId}").await;

    // Both the request path and the stored pattern are lower-cased by
    // the guard before the case-sensitive matcher runs.
    let decision = guard
        .authorize(&request("GET", "Roles/users/abc", Some("alice")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn method_must_match() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "skill-readers", user.id, "GET", "skills/{skillId}").await;

    let decision = guard
        .authorize(&request("POST", "skills/5f3", Some("alice")))
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn rejection_carries_status_and_reason() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "skill-readers", user.id, "GET", "skills/{skillId}").await;

    let decision = guard
        .authorize(&request("GET", "Opportunities/1", Some("alice")))
        .await
        .unwrap();

    match decision {
        Decision::Deny { status, reason } => {
            assert_eq!(status, 401);
            assert_eq!(
                reason,
                "RBAC error: user unauthorized to access opportunities/1"
            );
        }
        Decision::Allow => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn super_user_bypasses_all_checks() {
    let (db, guard, user) = setup().await;

    // A non-matching permission exists so the role table is
    // non-empty, and alice holds zero matching permissions.
    let other = SurrealUserAccountRepository::new(db.clone())
        .create(CreateUserAccount {
            username: "bob".into(),
            real_name: None,
            email: "bob@example.com".into(),
        })
        .await
        .unwrap();
    grant_permission(&db, "skill-readers", other.id, "GET", "skills").await;

    SurrealRoleRepository::new(db.clone())
        .create(CreateRole {
            name: Role::SUPER_USER.into(),
            permission_ids: vec![],
            user_ids: vec![user.id],
        })
        .await
        .unwrap();

    let decision = guard
        .authorize(&request("DELETE", "permissions/p9", Some("alice")))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn unknown_principal_is_rejected() {
    let (db, guard, user) = setup().await;
    grant_permission(&db, "skill-readers", user.id, "GET", "skills").await;

    let decision = guard
        .authorize(&request("GET", "skills", Some("mallory")))
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn user_without_matching_permission_is_rejected() {
    let (db, guard, user) = setup().await;

    grant_permission(&db, "skill-readers", user.id, "GET", "skills/{skillId}").await;

    let decision = guard
        .authorize(&request("GET", "roles/5f3", Some("alice")))
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn containment_accepts_reordered_segments_positional_rejects() {
    let (db, _guard, user) = setup().await;
    grant_permission(&db, "role-admins", user.id, "GET", "roles/users/{id}").await;

    let loose = build_guard(&db, RbacConfig::default());
    let strict = build_guard(
        &db,
        RbacConfig {
            match_mode: MatchMode::Positional,
            ..Default::default()
        },
    );

    // Literal segments reordered relative to the pattern.
    let reordered = request("GET", "users/roles/abc", Some("alice"));

    assert_eq!(loose.authorize(&reordered).await.unwrap(), Decision::Allow);
    assert!(!strict.authorize(&reordered).await.unwrap().is_allowed());

    // The straight path passes under both modes.
    let straight = request("GET", "roles/users/abc", Some("alice"));
    assert_eq!(loose.authorize(&straight).await.unwrap(), Decision::Allow);
    assert_eq!(strict.authorize(&straight).await.unwrap(), Decision::Allow);
}
