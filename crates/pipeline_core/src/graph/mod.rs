//! Display graph construction.
//!
//! # Responsibility
//! - Turn a decision lineage into labeled nodes and directed edges.
//! - Check graph well-formedness before layout.

pub mod builder;
