//! `atelier-core` — identifier types shared across the platform crates.

pub mod id;

pub use id::{ProjectId, SubjectId};
