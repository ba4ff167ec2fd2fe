//! Change audit recorder and history expansion.
//!
//! One [`Change`] record is written per mutation, holding full
//! before/after snapshots. The per-property [`ChangeDto`] projection
//! is computed when history is read, never stored.

use chrono::{DateTime, Utc};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::models::change::{Change, ChangeDto, ChangeKind, CreateChange};
use hiretrack_core::repository::ChangeRepository;
use serde_json::{Map, Value};
use tracing::debug;

/// Reserved range-query helper fields, skipped by diff expansion
/// regardless of entity type.
pub const IGNORED_PROPERTIES: &[&str] = &[
    "LowerTerm",
    "UpperTerm",
    "LowerTranslation",
    "UpperTranslation",
];

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

pub struct ChangeRecorder<C: ChangeRepository> {
    changes: C,
}

impl<C: ChangeRepository> ChangeRecorder<C> {
    pub fn new(changes: C) -> Self {
        Self { changes }
    }

    pub async fn created(
        &self,
        tenant_id: &str,
        entity_id: &str,
        new_document: Value,
        username: &str,
    ) -> HireTrackResult<Change> {
        self.record(tenant_id, entity_id, None, Some(new_document), username, ChangeKind::Create)
            .await
    }

    pub async fn updated(
        &self,
        tenant_id: &str,
        entity_id: &str,
        old_document: Option<Value>,
        new_document: Value,
        username: &str,
    ) -> HireTrackResult<Change> {
        self.record(
            tenant_id,
            entity_id,
            old_document,
            Some(new_document),
            username,
            ChangeKind::Update,
        )
        .await
    }

    pub async fn deleted(
        &self,
        tenant_id: &str,
        entity_id: &str,
        old_document: Value,
        username: &str,
    ) -> HireTrackResult<Change> {
        self.record(tenant_id, entity_id, Some(old_document), None, username, ChangeKind::Delete)
            .await
    }

    async fn record(
        &self,
        tenant_id: &str,
        entity_id: &str,
        old_entity: Option<Value>,
        new_entity: Option<Value>,
        username: &str,
        kind: ChangeKind,
    ) -> HireTrackResult<Change> {
        debug!(tenant_id, entity_id, ?kind, actor = username, "Recording change");
        self.changes
            .append(CreateChange {
                tenant_id: tenant_id.to_string(),
                entity_id: entity_id.to_string(),
                user: username.to_string(),
                kind,
                old_entity,
                new_entity,
            })
            .await
    }
}

// ---------------------------------------------------------------------------
// History expansion
// ---------------------------------------------------------------------------

pub struct ChangeLog<C: ChangeRepository> {
    changes: C,
}

impl<C: ChangeRepository> ChangeLog<C> {
    pub fn new(changes: C) -> Self {
        Self { changes }
    }

    /// Per-property change history for one entity, optionally bounded
    /// by an inclusive date range.
    ///
    /// Best-effort by design: a property that cannot be compared is
    /// dropped from the result, never failing the call.
    pub async fn history(
        &self,
        entity_id: &str,
        tenant_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> HireTrackResult<Vec<ChangeDto>> {
        let changes = self
            .changes
            .list_for_entity(tenant_id, entity_id, from, to)
            .await?;

        let mut rows = Vec::new();
        for change in &changes {
            expand_change(change, &mut rows);
        }

        Ok(rows)
    }
}

fn expand_change(change: &Change, rows: &mut Vec<ChangeDto>) {
    match change.kind {
        ChangeKind::Create => {
            if let Some(Value::Object(map)) = &change.new_entity {
                flatten_snapshot(change, map, "", SnapshotSide::New, rows);
            }
        }
        ChangeKind::Delete => {
            if let Some(Value::Object(map)) = &change.old_entity {
                flatten_snapshot(change, map, "", SnapshotSide::Previous, rows);
            }
        }
        ChangeKind::Update => {
            if let (Some(Value::Object(new_map)), Some(Value::Object(old_map))) =
                (&change.new_entity, &change.old_entity)
            {
                diff_top_level(change, new_map, old_map, rows);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum SnapshotSide {
    New,
    Previous,
}

/// Flatten one snapshot into per-property rows.
///
/// Array values recurse into their object elements with the parent
/// property name as prefix; the element index is not part of the
/// path, so sibling elements share one dot-path. Non-object array
/// elements produce no rows. Everything else, nested objects
/// included, emits one row carrying the raw value.
fn flatten_snapshot(
    change: &Change,
    map: &Map<String, Value>,
    prefix: &str,
    side: SnapshotSide,
    rows: &mut Vec<ChangeDto>,
) {
    let prefix = if prefix.is_empty() {
        String::new()
    } else {
        format!("{prefix}.")
    };

    for (key, value) in map {
        if IGNORED_PROPERTIES.contains(&key.as_str()) {
            continue;
        }

        match value {
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(object) = item {
                        flatten_snapshot(change, object, &format!("{prefix}{key}"), side, rows);
                    }
                }
            }
            other => {
                let (previous_value, new_value) = match side {
                    SnapshotSide::New => (None, Some(other.clone())),
                    SnapshotSide::Previous => (Some(other.clone()), None),
                };
                rows.push(ChangeDto {
                    entity_id: change.entity_id.clone(),
                    changed_by: change.user.clone(),
                    changed_date: change.changed_at,
                    property_name: format!("{prefix}{key}"),
                    previous_value,
                    new_value,
                });
            }
        }
    }
}

/// Compare the top-level properties of two snapshots and emit one row
/// per property whose representation differs.
///
/// Properties absent from the old snapshot are skipped, as is any
/// property null on either side: comparison failures drop the
/// property, not the call.
fn diff_top_level(
    change: &Change,
    new_map: &Map<String, Value>,
    old_map: &Map<String, Value>,
    rows: &mut Vec<ChangeDto>,
) {
    for (key, new_value) in new_map {
        if IGNORED_PROPERTIES.contains(&key.as_str()) {
            continue;
        }
        let Some(old_value) = old_map.get(key) else {
            continue;
        };
        if new_value.is_null() || old_value.is_null() {
            continue;
        }

        if value_repr(new_value) != value_repr(old_value) {
            rows.push(ChangeDto {
                entity_id: change.entity_id.clone(),
                changed_by: change.user.clone(),
                changed_date: change.changed_at,
                property_name: key.clone(),
                previous_value: Some(old_value.clone()),
                new_value: Some(new_value.clone()),
            });
        }
    }
}

/// String representation used for change comparison: strings compare
/// by their content, everything else by its JSON text.
fn value_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
