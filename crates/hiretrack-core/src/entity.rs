//! The seam between typed domain entities and the document form the
//! redaction and audit engines operate on.
//!
//! Entities cross this boundary exactly once per write: they are
//! serialized to a [`serde_json::Value`] document here, and every
//! downstream engine (field redaction, change diffing) works on that
//! document rather than walking typed fields.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{HireTrackError, HireTrackResult};

/// An entity type that can flow through the tracked write path.
pub trait TrackedEntity: Serialize + DeserializeOwned + Send + Sync {
    /// The class name field-permission rules and stored documents are
    /// keyed by.
    fn class_name() -> &'static str;

    /// Storage identifier of this instance.
    fn entity_id(&self) -> String;
}

/// Serialize an entity into its document form.
pub fn to_document<T: TrackedEntity>(entity: &T) -> HireTrackResult<serde_json::Value> {
    serde_json::to_value(entity).map_err(|e| {
        HireTrackError::Internal(format!(
            "failed to serialize {}: {e}",
            T::class_name()
        ))
    })
}

/// Rebuild a typed entity from its document form.
pub fn from_document<T: TrackedEntity>(document: serde_json::Value) -> HireTrackResult<T> {
    serde_json::from_value(document).map_err(|e| {
        HireTrackError::Internal(format!(
            "failed to deserialize {}: {e}",
            T::class_name()
        ))
    })
}
