//! SVG serialization of positioned graphs.
//!
//! # Responsibility
//! - Emit one self-contained `<svg>` document per positioned graph.
//! - Wrap and clip every label inside its circle.
//!
//! # Invariants
//! - All diagram content lives under one `zoom-pan-group` element.
//! - All user text is escaped before it reaches the markup.
//! - Output is deterministic for the same input.

use crate::layout::{LayoutKind, PositionedGraph, PositionedNode};
use crate::model::entity::ValidationError;
use crate::render::label::{escape_xml, wrap_label};
use crate::render::palette::Palette;
use crate::render::RenderResult;
use std::collections::HashMap;
use std::fmt::Write;

/// Renderer constants.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub palette: Palette,
    pub font_family: String,
    pub min_font_size: f64,
    /// Fixed font size for tiered lineage nodes.
    pub lineage_font_size: f64,
    pub text_padding: f64,
    pub packing_text_padding: f64,
    /// Distance of the edge control point from the chord midpoint.
    pub edge_bow: f64,
    pub line_height: f64,
    /// Average glyph width as a fraction of the font size.
    pub char_width_factor: f64,
    pub stroke: String,
    pub edge_color: String,
    pub fallback_width: f64,
    pub fallback_height: f64,
    pub fallback_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            font_family: "Arial".to_string(),
            min_font_size: 12.0,
            lineage_font_size: 14.0,
            text_padding: 10.0,
            packing_text_padding: 5.0,
            edge_bow: 30.0,
            line_height: 1.2,
            char_width_factor: 0.6,
            stroke: "#666".to_string(),
            edge_color: "gray".to_string(),
            fallback_width: 900.0,
            fallback_height: 200.0,
            fallback_message: "No data to display.".to_string(),
        }
    }
}

impl RenderConfig {
    /// Font size for a node of `radius` in a layout of `kind`.
    pub fn font_size(&self, kind: LayoutKind, radius: f64) -> f64 {
        match kind {
            LayoutKind::Tiered => self.lineage_font_size.max(self.min_font_size),
            LayoutKind::Packing => (radius / 4.0).max(self.min_font_size),
        }
    }

    fn padding(&self, kind: LayoutKind) -> f64 {
        match kind {
            LayoutKind::Tiered => self.text_padding,
            LayoutKind::Packing => self.packing_text_padding,
        }
    }
}

/// Rendered document plus its outer size.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub markup: String,
    pub width: f64,
    pub height: f64,
}

/// Renders `graph` as SVG markup.
///
/// An empty graph yields a fallback document carrying only a message.
///
/// # Errors
/// - `DanglingEdge` when an edge endpoint has no positioned node.
pub fn render_svg(graph: &PositionedGraph, config: &RenderConfig) -> RenderResult<SvgDocument> {
    if graph.is_empty() {
        return Ok(render_fallback(config));
    }

    let by_id: HashMap<&str, &PositionedNode> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();
    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        match (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) {
            (Some(source), Some(target)) => edges.push((*source, *target)),
            _ => {
                return Err(ValidationError::DanglingEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                })
            }
        }
    }
    let target_radius = edges
        .iter()
        .map(|(_, target)| target.radius)
        .fold(0.0, f64::max);

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{}" style="background-color: white;">"#,
        num(graph.width),
        num(graph.height),
        view_box_attribute(graph),
    );
    write_defs(&mut out, config, target_radius);
    out.push_str(r#"<g class="zoom-pan-group">"#);
    for (source, target) in &edges {
        write_edge(&mut out, config, source, target);
    }
    for node in &graph.nodes {
        write_node(&mut out, config, graph.kind, node);
    }
    out.push_str("</g></svg>");

    Ok(SvgDocument {
        markup: out,
        width: graph.width,
        height: graph.height,
    })
}

fn view_box_attribute(graph: &PositionedGraph) -> String {
    let view_box = graph.view_box;
    format!(
        "{} {} {} {}",
        num(view_box.x),
        num(view_box.y),
        num(view_box.width),
        num(view_box.height)
    )
}

fn write_defs(out: &mut String, config: &RenderConfig, target_radius: f64) {
    // Marker is 12 user units wide over a 10-unit box; pull the tip back to
    // the target circle's edge.
    let ref_x = 10.0 + target_radius * 10.0 / 12.0;
    let _ = write!(
        out,
        concat!(
            r#"<defs>"#,
            r#"<filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">"#,
            r#"<feGaussianBlur in="SourceAlpha" stdDeviation="3"/>"#,
            r#"<feOffset dx="2" dy="2"/>"#,
            r#"<feComponentTransfer><feFuncA type="linear" slope="0.3"/></feComponentTransfer>"#,
            r#"<feMerge><feMergeNode/><feMergeNode in="SourceGraphic"/></feMerge>"#,
            r#"</filter>"#,
            r#"<marker id="arrowhead" viewBox="0 0 10 10" refX="{}" refY="5" markerUnits="userSpaceOnUse" markerWidth="12" markerHeight="12" orient="auto">"#,
            r#"<path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/>"#,
            r#"</marker>"#,
            r#"</defs>"#,
        ),
        num(ref_x),
        escape_xml(&config.edge_color),
    );
}

fn write_edge(
    out: &mut String,
    config: &RenderConfig,
    source: &PositionedNode,
    target: &PositionedNode,
) {
    let (ctrl_x, ctrl_y) = control_point(
        (source.x, source.y),
        (target.x, target.y),
        config.edge_bow,
    );
    let _ = write!(
        out,
        r#"<path d="M {},{} Q {},{} {},{}" stroke="{}" stroke-width="2" fill="none" marker-end="url(#arrowhead)"/>"#,
        num(source.x),
        num(source.y),
        num(ctrl_x),
        num(ctrl_y),
        num(target.x),
        num(target.y),
        escape_xml(&config.edge_color),
    );
}

/// Chord midpoint pushed `bow` units along the chord's left normal.
pub fn control_point(start: (f64, f64), end: (f64, f64), bow: f64) -> (f64, f64) {
    let mid_x = (start.0 + end.0) / 2.0;
    let mid_y = (start.1 + end.1) / 2.0;
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return (mid_x, mid_y);
    }
    (mid_x + bow * dy / length, mid_y - bow * dx / length)
}

fn write_node(out: &mut String, config: &RenderConfig, kind: LayoutKind, node: &PositionedNode) {
    let category = node.category.as_str();
    let clip_id = format!("clip-{}", escape_xml(&node.id));
    let _ = write!(
        out,
        r#"<g transform="translate({},{})" class="node node-{}" filter="url(#shadow)">"#,
        num(node.x),
        num(node.y),
        category,
    );
    let _ = write!(
        out,
        r#"<clipPath id="{}"><circle r="{}"/></clipPath>"#,
        clip_id,
        num(node.radius),
    );
    let _ = write!(
        out,
        r#"<circle r="{}" fill="{}" stroke="{}" stroke-width="0.5"/>"#,
        num(node.radius),
        escape_xml(config.palette.fill(node.category)),
        escape_xml(&config.stroke),
    );

    let font_size = config.font_size(kind, node.radius);
    let text_box = (2.0 * (node.radius - config.padding(kind))).max(0.0);
    let line_step = font_size * config.line_height;
    let max_chars = (text_box / (font_size * config.char_width_factor)).floor() as usize;
    let max_lines = (text_box / line_step).floor() as usize;
    let lines = wrap_label(&node.label, max_chars, max_lines);

    let _ = write!(
        out,
        r#"<text text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}" clip-path="url(#{})">"#,
        escape_xml(&config.font_family),
        num(font_size),
        clip_id,
    );
    let first_y = -(lines.len() as f64 - 1.0) / 2.0 * line_step;
    for (idx, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<tspan x="0" y="{}">{}</tspan>"#,
            num(first_y + idx as f64 * line_step),
            escape_xml(line),
        );
    }
    out.push_str("</text></g>");
}

fn render_fallback(config: &RenderConfig) -> SvgDocument {
    let width = config.fallback_width;
    let height = config.fallback_height;
    let markup = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background-color: white;">"#,
            r#"<g class="zoom-pan-group">"#,
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" font-family="{font}" font-size="{size}">{message}</text>"#,
            r#"</g></svg>"#,
        ),
        w = num(width),
        h = num(height),
        cx = num(width / 2.0),
        cy = num(height / 2.0),
        font = escape_xml(&config.font_family),
        size = num(config.lineage_font_size.max(config.min_font_size)),
        message = escape_xml(&config.fallback_message),
    );
    SvgDocument {
        markup,
        width,
        height,
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0" for values that round to zero.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}
