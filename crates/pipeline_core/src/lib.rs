//! Core domain logic for the decision pipeline.
//! This crate is the single source of truth for relationship invariants.

pub mod db;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;
pub mod tabular;

pub use graph::builder::{
    build_lineage_graph, lineage_graph, GraphEdge, GraphNode, LineageGraph, NodeCategory,
};
pub use layout::config::{LayoutConfig, PackingConfig};
pub use layout::packing::{packing_layout, packing_radius, PackingItem};
pub use layout::tiered::tiered_layout;
pub use layout::{LayoutKind, PositionedGraph, PositionedNode, ViewBox};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::entity::{
    Concern, Decision, EntityKind, Goal, Question, Record, Task, TaskStatus, Todo, Urgency,
    ValidationError,
};
pub use render::request::{render_decision, render_overview, RenderSettings};
pub use render::svg::{render_svg, RenderConfig, SvgDocument};
pub use render::transform::ViewTransform;
pub use repo::store::{EntityStore, StoreRows};
pub use service::lineage::{Lineage, LineageGoal, LineageQuestion, LineageTask};
pub use service::pipeline_service::{
    PipelineError, PipelineResult, PipelineService, TaskUpdate, TodoUpdate,
};
pub use service::shared::SharedPipeline;
pub use tabular::workbook::{export_workbook, import_workbook, load_workbook};
pub use tabular::{TabularError, TabularResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
