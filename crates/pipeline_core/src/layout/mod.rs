//! Deterministic 2D placement of display graphs.
//!
//! # Responsibility
//! - Place lineage graphs on fixed tiers (`tiered`).
//! - Place same-kind items sized by urgency (`packing`).
//!
//! # Invariants
//! - Layout is a pure function of its input and config.
//! - The view box always contains every placed circle.

pub mod config;
pub mod packing;
pub mod tiered;

use crate::graph::builder::{GraphEdge, NodeCategory};
use crate::model::entity::ValidationError;
use serde::Serialize;

pub type LayoutResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Tiered,
    Packing,
}

/// Node with its circle center and radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub category: NodeCategory,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Smallest box covering both `self` and `other`.
    pub fn union(self, other: ViewBox) -> ViewBox {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        ViewBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn to_attribute(self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Layout output consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedGraph {
    pub kind: LayoutKind,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<GraphEdge>,
    pub view_box: ViewBox,
    pub width: f64,
    pub height: f64,
}

impl PositionedGraph {
    /// Graph with no nodes over a plain canvas.
    pub fn empty(kind: LayoutKind, width: f64, height: f64) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            edges: Vec::new(),
            view_box: ViewBox {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewBox;

    #[test]
    fn view_box_union_covers_both() {
        let canvas = ViewBox {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        };
        let circle = ViewBox {
            x: -10.0,
            y: 20.0,
            width: 40.0,
            height: 60.0,
        };
        let merged = canvas.union(circle);
        assert_eq!(merged.x, -10.0);
        assert_eq!(merged.y, 0.0);
        assert_eq!(merged.width, 110.0);
        assert_eq!(merged.height, 80.0);
        assert_eq!(merged.to_attribute(), "-10 0 110 80");
    }
}
