//! Integration tests for the field redaction engine using in-memory
//! SurrealDB.

use hiretrack_core::models::field_permission::{CreateFieldPermission, HiddenFieldAction};
use hiretrack_core::models::role::CreateRole;
use hiretrack_core::models::user::{CreateUserAccount, UserAccount};
use hiretrack_core::repository::{
    FieldPermissionRepository, RoleRepository, UserAccountRepository,
};
use hiretrack_db::repository::{
    SurrealFieldPermissionRepository, SurrealRoleRepository, SurrealUserAccountRepository,
};
use hiretrack_rbac::RedactionMode;
use hiretrack_rbac::redaction::FieldRedactor;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;
type Redactor = FieldRedactor<
    SurrealFieldPermissionRepository<Db>,
    SurrealUserAccountRepository<Db>,
    SurrealRoleRepository<Db>,
>;

fn build_redactor(db: &Surreal<Db>, mode: RedactionMode) -> Redactor {
    FieldRedactor::new(
        SurrealFieldPermissionRepository::new(db.clone()),
        SurrealUserAccountRepository::new(db.clone()),
        SurrealRoleRepository::new(db.clone()),
        mode,
    )
}

/// Helper: in-memory DB, migrations, one recruiter user in a
/// "recruiter" role.
async fn setup() -> (Surreal<Db>, Redactor, UserAccount) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hiretrack_db::run_migrations(&db).await.unwrap();

    let user = SurrealUserAccountRepository::new(db.clone())
        .create(CreateUserAccount {
            username: "bob".into(),
            real_name: None,
            email: "bob@example.com".into(),
        })
        .await
        .unwrap();

    SurrealRoleRepository::new(db.clone())
        .create(CreateRole {
            name: "recruiter".into(),
            permission_ids: vec![],
            user_ids: vec![user.id],
        })
        .await
        .unwrap();

    let redactor = build_redactor(&db, RedactionMode::RestorePrevious);
    (db, redactor, user)
}

async fn add_rule(db: &Surreal<Db>, input: CreateFieldPermission) {
    SurrealFieldPermissionRepository::new(db.clone())
        .create(input)
        .await
        .unwrap();
}

fn salary_rule_for_role(role: &str) -> CreateFieldPermission {
    CreateFieldPermission {
        role_name: Some(role.into()),
        user_name: None,
        class_name: "Candidate".into(),
        property_name: "SalaryExpectation".into(),
        action: HiddenFieldAction::Redact,
        substitution_text: None,
    }
}

#[tokio::test]
async fn role_scoped_rule_restores_the_previous_value() {
    let (db, redactor, _user) = setup().await;
    add_rule(&db, salary_rule_for_role("recruiter")).await;

    let old = json!({"Name": "Carol", "SalaryExpectation": 90_000});
    let new = json!({"Name": "Carol", "SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();

    assert_eq!(result["SalaryExpectation"], json!(90_000));
    assert_eq!(result["Name"], json!("Carol"));
}

#[tokio::test]
async fn user_scoped_rule_applies_to_that_user_only() {
    let (db, redactor, _user) = setup().await;
    add_rule(
        &db,
        CreateFieldPermission {
            role_name: None,
            user_name: Some("bob".into()),
            class_name: "Candidate".into(),
            property_name: "Phone".into(),
            action: HiddenFieldAction::Redact,
            substitution_text: None,
        },
    )
    .await;

    let old = json!({"Phone": "555-0100"});
    let new = json!({"Phone": "555-9999"});

    let result = redactor
        .apply(new.clone(), &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    assert_eq!(result["Phone"], json!("555-0100"));

    // A different (known) user is unaffected by bob's rule.
    SurrealUserAccountRepository::new(db.clone())
        .create(CreateUserAccount {
            username: "dana".into(),
            real_name: None,
            email: "dana@example.com".into(),
        })
        .await
        .unwrap();
    let result = redactor
        .apply(new, &old, "Candidate", "acme", "dana")
        .await
        .unwrap();
    assert_eq!(result["Phone"], json!("555-9999"));
}

#[tokio::test]
async fn class_wide_rule_applies_to_users_with_no_roles() {
    let (db, redactor, _user) = setup().await;
    add_rule(
        &db,
        CreateFieldPermission {
            role_name: None,
            user_name: None,
            class_name: "Candidate".into(),
            property_name: "Notes".into(),
            action: HiddenFieldAction::Redact,
            substitution_text: None,
        },
    )
    .await;

    SurrealUserAccountRepository::new(db.clone())
        .create(CreateUserAccount {
            username: "dana".into(),
            real_name: None,
            email: "dana@example.com".into(),
        })
        .await
        .unwrap();

    let old = json!({"Notes": "confidential"});
    let new = json!({"Notes": "edited"});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "dana")
        .await
        .unwrap();
    assert_eq!(result["Notes"], json!("confidential"));
}

#[tokio::test]
async fn rules_for_other_classes_are_ignored() {
    let (db, redactor, _user) = setup().await;
    add_rule(
        &db,
        CreateFieldPermission {
            role_name: Some("recruiter".into()),
            user_name: None,
            class_name: "Opportunity".into(),
            property_name: "SalaryExpectation".into(),
            action: HiddenFieldAction::Redact,
            substitution_text: None,
        },
    )
    .await;

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(140_000));
}

#[tokio::test]
async fn property_names_match_case_insensitively() {
    let (db, redactor, _user) = setup().await;
    add_rule(
        &db,
        CreateFieldPermission {
            role_name: Some("recruiter".into()),
            user_name: None,
            class_name: "Candidate".into(),
            property_name: "salaryexpectation".into(),
            action: HiddenFieldAction::Redact,
            substitution_text: None,
        },
    )
    .await;

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(90_000));
}

#[tokio::test]
async fn system_user_and_empty_tenant_bypass_redaction() {
    let (db, redactor, _user) = setup().await;
    add_rule(&db, salary_rule_for_role("recruiter")).await;

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new.clone(), &old, "Candidate", "acme", "SYSTEM")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(140_000));

    let result = redactor
        .apply(new, &old, "Candidate", "", "bob")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(140_000));
}

#[tokio::test]
async fn unknown_actor_leaves_the_document_unchanged() {
    let (db, redactor, _user) = setup().await;
    add_rule(&db, salary_rule_for_role("recruiter")).await;

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "mallory")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(140_000));
}

#[tokio::test]
async fn applying_twice_equals_applying_once() {
    let (db, redactor, _user) = setup().await;
    add_rule(&db, salary_rule_for_role("recruiter")).await;

    let old = json!({"Name": "Carol", "SalaryExpectation": 90_000});
    let new = json!({"Name": "Carol", "SalaryExpectation": 140_000});

    let once = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    let twice = redactor
        .apply(once.clone(), &old, "Candidate", "acme", "bob")
        .await
        .unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn declared_action_mode_redacts_to_null() {
    let (db, _default_redactor, _user) = setup().await;
    add_rule(&db, salary_rule_for_role("recruiter")).await;

    let redactor = build_redactor(&db, RedactionMode::ApplyDeclaredAction);

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!(null));
}

#[tokio::test]
async fn declared_action_mode_substitutes_configured_text() {
    let (db, _default_redactor, _user) = setup().await;
    add_rule(
        &db,
        CreateFieldPermission {
            role_name: Some("recruiter".into()),
            user_name: None,
            class_name: "Candidate".into(),
            property_name: "SalaryExpectation".into(),
            action: HiddenFieldAction::Substitute,
            substitution_text: Some("*** hidden ***".into()),
        },
    )
    .await;

    let redactor = build_redactor(&db, RedactionMode::ApplyDeclaredAction);

    let old = json!({"SalaryExpectation": 90_000});
    let new = json!({"SalaryExpectation": 140_000});

    let result = redactor
        .apply(new, &old, "Candidate", "acme", "bob")
        .await
        .unwrap();
    assert_eq!(result["SalaryExpectation"], json!("*** hidden ***"));
}
