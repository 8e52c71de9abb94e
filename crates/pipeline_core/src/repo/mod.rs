//! Entity storage and derived relation indices.
//!
//! # Responsibility
//! - Hold the six ordered record collections (`store`).
//! - Hold parent → child key indices derived from them (`relations`).
//!
//! # Invariants
//! - The store is the only owner of record data.
//! - Relation indices are kept in step by `PipelineService`; they are never
//!   edited from outside the crate.

pub mod relations;
pub mod store;
