//! Integration tests for change recording, history expansion, and the
//! tracked write path, using in-memory SurrealDB.

use hiretrack_core::entity::TrackedEntity;
use hiretrack_core::models::candidate::{Candidate, SkillRating};
use hiretrack_core::models::field_permission::{CreateFieldPermission, HiddenFieldAction};
use hiretrack_core::models::role::CreateRole;
use hiretrack_core::repository::{
    FieldPermissionRepository, RoleRepository, UserAccountRepository,
};
use hiretrack_core::models::user::CreateUserAccount;
use hiretrack_db::repository::{
    SurrealChangeRepository, SurrealDocumentStore, SurrealFieldPermissionRepository,
    SurrealRoleRepository, SurrealUserAccountRepository,
};
use hiretrack_rbac::RedactionMode;
use hiretrack_rbac::audit::{ChangeLog, ChangeRecorder};
use hiretrack_rbac::redaction::FieldRedactor;
use hiretrack_rbac::store::{TrackedStore, TrackedStoreOptions};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    hiretrack_db::run_migrations(&db).await.unwrap();
    db
}

fn recorder(db: &Surreal<Db>) -> ChangeRecorder<SurrealChangeRepository<Db>> {
    ChangeRecorder::new(SurrealChangeRepository::new(db.clone()))
}

fn change_log(db: &Surreal<Db>) -> ChangeLog<SurrealChangeRepository<Db>> {
    ChangeLog::new(SurrealChangeRepository::new(db.clone()))
}

// ---------------------------------------------------------------------------
// History expansion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_expands_to_one_row_per_property() {
    let db = setup().await;

    recorder(&db)
        .created("acme", "c1", json!({"Name": "Alice", "Age": 30}), "hr")
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    let name = rows.iter().find(|r| r.property_name == "Name").unwrap();
    assert_eq!(name.new_value, Some(json!("Alice")));
    assert!(name.previous_value.is_none());
    assert_eq!(name.changed_by, "hr");

    let age = rows.iter().find(|r| r.property_name == "Age").unwrap();
    assert_eq!(age.new_value, Some(json!(30)));
    assert!(age.previous_value.is_none());
}

#[tokio::test]
async fn ignored_properties_produce_no_rows() {
    let db = setup().await;

    recorder(&db)
        .created(
            "acme",
            "c1",
            json!({
                "Name": "Alice",
                "LowerTerm": "aaa",
                "UpperTerm": "zzz",
                "LowerTranslation": "aaa",
                "UpperTranslation": "zzz",
            }),
            "hr",
        )
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property_name, "Name");
}

#[tokio::test]
async fn update_emits_only_changed_properties() {
    let db = setup().await;

    recorder(&db)
        .updated(
            "acme",
            "c1",
            Some(json!({"Name": "Alice", "Phone": "555"})),
            json!({"Name": "Bob", "Phone": "555"}),
            "hr",
        )
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].property_name, "Name");
    assert_eq!(rows[0].previous_value, Some(json!("Alice")));
    assert_eq!(rows[0].new_value, Some(json!("Bob")));
}

#[tokio::test]
async fn delete_expands_with_previous_values_only() {
    let db = setup().await;

    recorder(&db)
        .deleted("acme", "c1", json!({"Name": "Alice", "Age": 30}), "hr")
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(row.previous_value.is_some());
        assert!(row.new_value.is_none());
    }
}

#[tokio::test]
async fn nested_list_elements_flatten_under_the_parent_property() {
    let db = setup().await;

    recorder(&db)
        .created(
            "acme",
            "c1",
            json!({
                "Name": "Alice",
                "Skills": [
                    {"Skill": "Rust", "Level": "Senior"},
                    {"Skill": "SQL", "Level": "Mid"},
                ],
            }),
            "hr",
        )
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    // Element index is not part of the path: both list entries emit
    // rows under the same dot-path.
    let skill_rows: Vec<_> = rows
        .iter()
        .filter(|r| r.property_name == "Skills.Skill")
        .collect();
    assert_eq!(skill_rows.len(), 2);

    let values: Vec<_> = skill_rows
        .iter()
        .map(|r| r.new_value.clone().unwrap())
        .collect();
    assert!(values.contains(&json!("Rust")));
    assert!(values.contains(&json!("SQL")));
}

#[tokio::test]
async fn history_accumulates_across_mutations() {
    let db = setup().await;
    let rec = recorder(&db);

    rec.created("acme", "c1", json!({"Name": "Alice"}), "hr")
        .await
        .unwrap();
    rec.updated(
        "acme",
        "c1",
        Some(json!({"Name": "Alice"})),
        json!({"Name": "Bob"}),
        "hr",
    )
    .await
    .unwrap();
    rec.deleted("acme", "c1", json!({"Name": "Bob"}), "hr")
        .await
        .unwrap();

    let rows = change_log(&db)
        .history("c1", "acme", None, None)
        .await
        .unwrap();

    // One row from the create, one from the update, one from the
    // delete.
    assert_eq!(rows.len(), 3);
}

// ---------------------------------------------------------------------------
// Tracked write path
// ---------------------------------------------------------------------------

type CandidateStore = TrackedStore<
    Candidate,
    SurrealDocumentStore<Db>,
    SurrealFieldPermissionRepository<Db>,
    SurrealUserAccountRepository<Db>,
    SurrealRoleRepository<Db>,
    SurrealChangeRepository<Db>,
>;

fn candidate_store(db: &Surreal<Db>, track_changes: bool) -> CandidateStore {
    TrackedStore::new(
        SurrealDocumentStore::new(db.clone()),
        FieldRedactor::new(
            SurrealFieldPermissionRepository::new(db.clone()),
            SurrealUserAccountRepository::new(db.clone()),
            SurrealRoleRepository::new(db.clone()),
            RedactionMode::RestorePrevious,
        ),
        recorder(db),
        TrackedStoreOptions { track_changes },
    )
}

fn sample_candidate() -> Candidate {
    Candidate {
        id: uuid::Uuid::new_v4(),
        name: "Carol".into(),
        email: "carol@example.com".into(),
        phone: "555-0100".into(),
        salary_expectation: 90_000,
        notes: "strong systems background".into(),
        skills: vec![SkillRating {
            skill: "Rust".into(),
            level: "Senior".into(),
            years: 5,
        }],
    }
}

#[tokio::test]
async fn tracked_store_round_trips_entities() {
    let db = setup().await;
    let store = candidate_store(&db, false);

    let candidate = sample_candidate();
    let id = candidate.entity_id();

    store.add(candidate.clone(), "acme", "hr").await.unwrap();

    let fetched = store.get(&id, "acme").await.unwrap().unwrap();
    assert_eq!(fetched, candidate);

    store.remove(&id, "acme", "hr").await.unwrap();
    assert!(store.get(&id, "acme").await.unwrap().is_none());
}

#[tokio::test]
async fn tracking_disabled_writes_no_history() {
    let db = setup().await;
    let store = candidate_store(&db, false);

    let candidate = sample_candidate();
    let id = candidate.entity_id();
    store.add(candidate, "acme", "hr").await.unwrap();

    let rows = change_log(&db).history(&id, "acme", None, None).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn tracked_mutations_build_the_audit_trail() {
    let db = setup().await;
    let store = candidate_store(&db, true);

    let mut candidate = sample_candidate();
    let id = candidate.entity_id();

    store.add(candidate.clone(), "acme", "hr").await.unwrap();

    candidate.name = "Caroline".into();
    store.update(candidate, "acme", "hr").await.unwrap();

    store.remove(&id, "acme", "hr").await.unwrap();

    let rows = change_log(&db).history(&id, "acme", None, None).await.unwrap();

    // The update contributes exactly one row, for the renamed
    // property.
    let update_rows: Vec<_> = rows
        .iter()
        .filter(|r| r.previous_value.is_some() && r.new_value.is_some())
        .collect();
    assert_eq!(update_rows.len(), 1);
    assert_eq!(update_rows[0].property_name, "Name");
    assert_eq!(update_rows[0].previous_value, Some(json!("Carol")));
    assert_eq!(update_rows[0].new_value, Some(json!("Caroline")));

    // Create rows carry new values only, delete rows old values only.
    assert!(rows.iter().any(|r| r.new_value.is_some() && r.previous_value.is_none()));
    assert!(rows.iter().any(|r| r.previous_value.is_some() && r.new_value.is_none()));
}

#[tokio::test]
async fn redacted_updates_persist_the_previous_value() {
    let db = setup().await;
    let store = candidate_store(&db, true);

    // bob is a recruiter; recruiters may not change salary
    // expectations.
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
    SurrealFieldPermissionRepository::new(db.clone())
        .create(CreateFieldPermission {
            role_name: Some("recruiter".into()),
            user_name: None,
            class_name: "Candidate".into(),
            property_name: "SalaryExpectation".into(),
            action: HiddenFieldAction::Redact,
            substitution_text: None,
        })
        .await
        .unwrap();

    let mut candidate = sample_candidate();
    let id = candidate.entity_id();
    store.add(candidate.clone(), "acme", "hr").await.unwrap();

    candidate.salary_expectation = 150_000;
    candidate.notes = "negotiating".into();
    let persisted = store.update(candidate, "acme", "bob").await.unwrap();

    // The blocked field reverted; the permitted field went through.
    assert_eq!(persisted.salary_expectation, 90_000);
    assert_eq!(persisted.notes, "negotiating");

    let stored = store.get(&id, "acme").await.unwrap().unwrap();
    assert_eq!(stored.salary_expectation, 90_000);

    // The audit trail reflects the write as persisted: no salary row,
    // one notes row.
    let rows = change_log(&db).history(&id, "acme", None, None).await.unwrap();
    let update_rows: Vec<_> = rows
        .iter()
        .filter(|r| r.previous_value.is_some() && r.new_value.is_some())
        .collect();
    assert_eq!(update_rows.len(), 1);
    assert_eq!(update_rows[0].property_name, "Notes");
}

#[tokio::test]
async fn create_then_history_includes_nested_skills() {
    let db = setup().await;
    let store = candidate_store(&db, true);

    let candidate = sample_candidate();
    let id = candidate.entity_id();
    store.add(candidate, "acme", "hr").await.unwrap();

    let rows = change_log(&db).history(&id, "acme", None, None).await.unwrap();

    assert!(rows.iter().any(|r| r.property_name == "Skills.Skill"));
    assert!(rows.iter().any(|r| r.property_name == "Skills.Level"));
    assert!(rows.iter().any(|r| r.property_name == "Skills.Years"));
    // The list elements themselves never appear as a whole-value row.
    assert!(!rows.iter().any(|r| r.property_name == "Skills"));
}
