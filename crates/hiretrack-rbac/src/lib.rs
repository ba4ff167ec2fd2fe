//! HireTrack RBAC — role resolution, request authorization, field
//! redaction, and change auditing.
//!
//! The engine sits between the transport layer and the document
//! store: the [`guard::RequestGuard`] authorizes inbound requests
//! before business logic runs, and [`store::TrackedStore`] applies
//! field-permission filtering and audit recording on every entity
//! write.

pub mod admin;
pub mod audit;
pub mod config;
pub mod guard;
pub mod matcher;
pub mod redaction;
pub mod resolver;
pub mod store;

pub use config::{MatchMode, RbacConfig, RedactionMode};
pub use guard::{Decision, RequestContext, RequestGuard};
pub use resolver::RoleResolver;
