//! Typed domain model for the decision pipeline.
//!
//! # Responsibility
//! - Define canonical records for the six entity kinds.
//! - Keep scalar validation next to the types it protects.
//!
//! # Invariants
//! - Every record is identified by its key text, unique within its kind.
//! - Deletion is a hard delete; there are no tombstones.

pub mod entity;
