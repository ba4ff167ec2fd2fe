//! SurrealDB repository implementations.

mod change;
mod document;
mod field_permission;
mod permission;
mod role;
mod user;

pub use change::SurrealChangeRepository;
pub use document::SurrealDocumentStore;
pub use field_permission::{SurrealFieldPermissionRepository, SurrealFieldPermissionTypeRepository};
pub use permission::SurrealPermissionRepository;
pub use role::SurrealRoleRepository;
pub use user::SurrealUserAccountRepository;
