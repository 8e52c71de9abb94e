//! Tiered lineage layout.
//!
//! Decision at the apex, rationale beneath it, questions on a middle band
//! fanned over their concerns on the base band, goals on a diagonal to the
//! right with their tasks in rows.

use crate::graph::builder::{LineageGraph, NodeCategory};
use crate::layout::config::LayoutConfig;
use crate::layout::{LayoutKind, LayoutResult, PositionedGraph, PositionedNode, ViewBox};
use crate::model::entity::ValidationError;
use std::collections::HashMap;

const QUESTION_SPACING: f64 = 0.8;
const MIN_GROUP_WIDTH: f64 = 1.5;
const GOAL_STEP: f64 = 0.75;
const TASK_STEP: f64 = 0.6;

/// Places a lineage graph on fixed tiers.
///
/// # Errors
/// - Dangling edges or duplicate ids.
/// - `MissingApex` when a non-empty graph has no decision node.
pub fn tiered_layout(graph: &LineageGraph, config: &LayoutConfig) -> LayoutResult<PositionedGraph> {
    graph.validate()?;
    if graph.is_empty() {
        return Ok(PositionedGraph::empty(
            LayoutKind::Tiered,
            config.width,
            config.height,
        ));
    }

    let decision = graph
        .nodes_of(NodeCategory::Decision)
        .next()
        .ok_or(ValidationError::MissingApex)?;

    let vs = config.vertical_spacing();
    let hs = config.horizontal_spacing();
    let apex = config.apex_y();
    let base = config.base_y();
    let center = config.center_x();

    let mut positions: HashMap<&str, (f64, f64)> = HashMap::new();
    positions.insert(decision.id.as_str(), (center, apex));
    if let Some(rationale) = graph.nodes_of(NodeCategory::Rationale).next() {
        positions.insert(rationale.id.as_str(), (center, apex + vs));
    }

    // Concern groups in first-appearance order over the questions.
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for question in graph.nodes_of(NodeCategory::Question) {
        let concern = graph.edges.iter().find_map(|edge| {
            let is_concern = graph
                .node(&edge.source)
                .is_some_and(|node| node.category == NodeCategory::Concern);
            (edge.target == question.id && is_concern).then_some(edge.source.as_str())
        });
        let Some(concern) = concern else {
            continue;
        };
        match groups.iter_mut().find(|(id, _)| *id == concern) {
            Some((_, questions)) => questions.push(question.id.as_str()),
            None => groups.push((concern, vec![question.id.as_str()])),
        }
    }

    let question_y = (apex + vs + base) / 2.0;
    let question_spacing = hs * QUESTION_SPACING;
    let widths: Vec<f64> = groups
        .iter()
        .map(|(_, questions)| {
            (hs * MIN_GROUP_WIDTH).max(questions.len() as f64 * question_spacing)
        })
        .collect();
    let mut cursor = center - widths.iter().sum::<f64>() / 2.0;
    for ((concern, questions), width) in groups.iter().zip(&widths) {
        let group_center = cursor + width / 2.0;
        positions.insert(*concern, (group_center, base));
        let offset = (questions.len() as f64 - 1.0) / 2.0;
        for (j, question) in questions.iter().enumerate() {
            let x = group_center + (j as f64 - offset) * question_spacing;
            positions.insert(*question, (x, question_y));
        }
        cursor += width;
    }

    let rightmost = positions
        .values()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let goal_start = (center + hs).max(rightmost + hs);
    for (i, goal) in graph.nodes_of(NodeCategory::Goal).enumerate() {
        let goal_x = goal_start + i as f64 * GOAL_STEP * hs;
        let goal_y = apex + i as f64 * vs;
        positions.insert(goal.id.as_str(), (goal_x, goal_y));
        for (j, task) in graph.successors(&goal.id).enumerate() {
            let task_x = goal_x + hs + j as f64 * TASK_STEP * hs;
            positions.insert(task, (task_x, goal_y));
        }
    }

    // Anything the tiers did not claim goes on a row under the base band.
    let mut fallback_x = config.margin;
    let nodes: Vec<PositionedNode> = graph
        .nodes
        .iter()
        .map(|node| {
            let (x, y) = match positions.get(node.id.as_str()) {
                Some(position) => *position,
                None => {
                    let position = (fallback_x, base + vs);
                    fallback_x += hs;
                    position
                }
            };
            PositionedNode {
                id: node.id.clone(),
                category: node.category,
                label: node.label.clone(),
                x,
                y,
                radius: config.node_radius,
            }
        })
        .collect();

    let view_box = center_bounds(&nodes, config.margin);
    Ok(PositionedGraph {
        kind: LayoutKind::Tiered,
        width: view_box.width.max(config.width),
        height: view_box.height.max(config.height),
        nodes,
        edges: graph.edges.clone(),
        view_box,
    })
}

/// Bounding box of node centers grown by `margin` on every side.
fn center_bounds(nodes: &[PositionedNode], margin: f64) -> ViewBox {
    let (min_x, min_y, max_x, max_y) = nodes.iter().fold(
        (
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        ),
        |(min_x, min_y, max_x, max_y), node| {
            (
                min_x.min(node.x),
                min_y.min(node.y),
                max_x.max(node.x),
                max_y.max(node.y),
            )
        },
    );
    ViewBox {
        x: min_x - margin,
        y: min_y - margin,
        width: max_x - min_x + 2.0 * margin,
        height: max_y - min_y + 2.0 * margin,
    }
}
