//! Urgency-weighted packing layout.
//!
//! Items are sized by urgency and placed on a polygon or ring around the
//! canvas center, most urgent first.

use crate::graph::builder::NodeCategory;
use crate::layout::config::PackingConfig;
use crate::layout::{LayoutKind, PositionedGraph, PositionedNode, ViewBox};
use crate::model::entity::Urgency;
use serde::Serialize;
use std::f64::consts::TAU;

/// One circle to place: display text plus its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackingItem {
    pub label: String,
    pub urgency: Urgency,
}

/// Circle radius for `urgency`; urgency 50 maps to `base_radius`.
pub fn packing_radius(urgency: Urgency, config: &PackingConfig) -> f64 {
    config.base_radius * f64::from(urgency.get()) / 50.0
}

/// Places items of one kind.
pub fn packing_layout(
    items: &[PackingItem],
    category: NodeCategory,
    config: &PackingConfig,
) -> PositionedGraph {
    if items.is_empty() {
        return PositionedGraph::empty(LayoutKind::Packing, config.width, config.height);
    }

    let mut ordered: Vec<&PackingItem> = items.iter().collect();
    ordered.sort_by(|left, right| right.urgency.cmp(&left.urgency));

    let center_x = config.width / 2.0;
    let center_y = config.height / 2.0;
    let count = ordered.len();
    let ring = match count {
        1 => 0.0,
        2..=3 => config.width.min(config.height) / 4.0,
        _ => config.width.min(config.height) / 3.0,
    };

    let mut view_box = ViewBox {
        x: 0.0,
        y: 0.0,
        width: config.width,
        height: config.height,
    };
    let nodes: Vec<PositionedNode> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let angle = i as f64 * TAU / count as f64;
            let x = center_x + ring * angle.cos();
            let y = center_y + ring * angle.sin();
            let radius = packing_radius(item.urgency, config);
            let reach = radius + config.padding;
            view_box = view_box.union(ViewBox {
                x: x - reach,
                y: y - reach,
                width: 2.0 * reach,
                height: 2.0 * reach,
            });
            PositionedNode {
                id: format!("i{}", i + 1),
                category,
                label: item.label.clone(),
                x,
                y,
                radius,
            }
        })
        .collect();

    PositionedGraph {
        kind: LayoutKind::Packing,
        nodes,
        edges: Vec::new(),
        view_box,
        width: view_box.width,
        height: view_box.height,
    }
}
