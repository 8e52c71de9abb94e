//! Render requests: store → graph → layout → SVG.

use crate::graph::builder::lineage_graph;
use crate::layout::config::{LayoutConfig, PackingConfig};
use crate::layout::packing::packing_layout;
use crate::layout::tiered::tiered_layout;
use crate::model::entity::EntityKind;
use crate::render::svg::{render_svg, RenderConfig, SvgDocument};
use crate::render::RenderResult;
use crate::service::pipeline_service::PipelineService;
use log::debug;

/// Every knob a render request can turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSettings {
    pub layout: LayoutConfig,
    pub packing: PackingConfig,
    pub render: RenderConfig,
}

/// Renders the lineage of one decision.
///
/// An unknown decision renders the fallback document.
pub fn render_decision(
    service: &PipelineService,
    decision_key: &str,
    settings: &RenderSettings,
) -> RenderResult<SvgDocument> {
    let graph = lineage_graph(service, decision_key);
    let positioned = tiered_layout(&graph, &settings.layout)?;
    debug!(
        "event=render_decision module=render status=ok nodes={} edges={}",
        positioned.nodes.len(),
        positioned.edges.len()
    );
    render_svg(&positioned, &settings.render)
}

/// Renders every record of `kind` sized by urgency.
pub fn render_overview(
    service: &PipelineService,
    kind: EntityKind,
    settings: &RenderSettings,
) -> RenderResult<SvgDocument> {
    let items = service.overview_items(kind);
    let positioned = packing_layout(&items, kind.into(), &settings.packing);
    debug!(
        "event=render_overview module=render status=ok kind={} nodes={}",
        kind,
        positioned.nodes.len()
    );
    render_svg(&positioned, &settings.render)
}
