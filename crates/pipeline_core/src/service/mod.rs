//! Core use-case services.
//!
//! # Responsibility
//! - Own the entity store and enforce relationship invariants on it.
//! - Answer lineage and list queries for the render layer.
//! - Offer a lock-guarded handle for hosts that share one pipeline.

pub mod lineage;
pub mod pipeline_service;
pub mod queries;
pub mod shared;
