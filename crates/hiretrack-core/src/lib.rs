//! HireTrack Core — domain models, repository trait definitions, and
//! error types shared across all crates.

pub mod entity;
pub mod error;
pub mod models;
pub mod repository;
