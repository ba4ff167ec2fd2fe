//! The tracked write path.
//!
//! [`TrackedStore`] is the repository surface business services write
//! through: it serializes the entity to its document form, applies
//! field redaction on updates, records the audit change, and persists
//! the result. All steps run sequentially on the caller's task;
//! nothing is deferred or batched.

use std::marker::PhantomData;

use hiretrack_core::entity::{self, TrackedEntity};
use hiretrack_core::error::HireTrackResult;
use hiretrack_core::repository::{
    ChangeRepository, DocumentStore, FieldPermissionRepository, RoleRepository,
    UserAccountRepository,
};

use crate::audit::ChangeRecorder;
use crate::redaction::FieldRedactor;

/// Per-store options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedStoreOptions {
    /// Whether mutations write audit change records. Off by default;
    /// the recording machinery is always wired so stores can opt in
    /// per entity type.
    pub track_changes: bool,
}

pub struct TrackedStore<T, S, F, U, R, C>
where
    T: TrackedEntity,
    S: DocumentStore,
    F: FieldPermissionRepository,
    U: UserAccountRepository,
    R: RoleRepository,
    C: ChangeRepository,
{
    documents: S,
    redactor: FieldRedactor<F, U, R>,
    recorder: ChangeRecorder<C>,
    options: TrackedStoreOptions,
    _entity: PhantomData<T>,
}

impl<T, S, F, U, R, C> TrackedStore<T, S, F, U, R, C>
where
    T: TrackedEntity,
    S: DocumentStore,
    F: FieldPermissionRepository,
    U: UserAccountRepository,
    R: RoleRepository,
    C: ChangeRepository,
{
    pub fn new(
        documents: S,
        redactor: FieldRedactor<F, U, R>,
        recorder: ChangeRecorder<C>,
        options: TrackedStoreOptions,
    ) -> Self {
        Self {
            documents,
            redactor,
            recorder,
            options,
            _entity: PhantomData,
        }
    }

    pub async fn get(&self, entity_id: &str, tenant_id: &str) -> HireTrackResult<Option<T>> {
        let document = self
            .documents
            .get(tenant_id, T::class_name(), entity_id)
            .await?;
        document.map(entity::from_document).transpose()
    }

    /// Insert a new entity. Field redaction does not apply on create:
    /// with no prior document there is nothing to lock.
    pub async fn add(&self, new_entity: T, tenant_id: &str, username: &str) -> HireTrackResult<T> {
        let entity_id = new_entity.entity_id();
        let document = entity::to_document(&new_entity)?;

        self.documents
            .upsert(tenant_id, T::class_name(), &entity_id, document.clone())
            .await?;

        if self.options.track_changes {
            self.recorder
                .created(tenant_id, &entity_id, document, username)
                .await?;
        }

        Ok(new_entity)
    }

    /// Update an existing entity. The prior document is loaded first;
    /// properties the acting user may not change are rewritten before
    /// the change is recorded and the document upserted. Returns the
    /// entity as persisted, redactions included.
    pub async fn update(
        &self,
        new_entity: T,
        tenant_id: &str,
        username: &str,
    ) -> HireTrackResult<T> {
        let entity_id = new_entity.entity_id();
        let mut document = entity::to_document(&new_entity)?;

        let old_document = self
            .documents
            .get(tenant_id, T::class_name(), &entity_id)
            .await?;

        if let Some(old) = &old_document {
            document = self
                .redactor
                .apply(document, old, T::class_name(), tenant_id, username)
                .await?;
        }

        if self.options.track_changes {
            self.recorder
                .updated(tenant_id, &entity_id, old_document, document.clone(), username)
                .await?;
        }

        self.documents
            .upsert(tenant_id, T::class_name(), &entity_id, document.clone())
            .await?;

        entity::from_document(document)
    }

    /// Delete an entity, recording the old snapshot first when change
    /// tracking is on. Deleting an absent entity is a no-op.
    pub async fn remove(
        &self,
        entity_id: &str,
        tenant_id: &str,
        username: &str,
    ) -> HireTrackResult<()> {
        if self.options.track_changes {
            let old_document = self
                .documents
                .get(tenant_id, T::class_name(), entity_id)
                .await?;
            if let Some(old) = old_document {
                self.recorder
                    .deleted(tenant_id, entity_id, old, username)
                    .await?;
            }
        }

        self.documents
            .remove(tenant_id, T::class_name(), entity_id)
            .await
    }
}
