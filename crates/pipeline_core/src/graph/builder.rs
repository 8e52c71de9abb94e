//! Lineage snapshot → directed display graph.
//!
//! # Invariants
//! - Node ids are unique: `d1`, `r1`, `q{n}`, `c{n}`, `g{n}`, `t{n}`.
//! - A concern shared by several questions becomes one node.
//! - Every edge endpoint is a node of the same graph.

use crate::model::entity::{EntityKind, ValidationError};
use crate::service::lineage::Lineage;
use crate::service::pipeline_service::PipelineService;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Display category of a node; selects its fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Concern,
    Question,
    Decision,
    Rationale,
    Goal,
    Task,
    Todo,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concern => "concern",
            Self::Question => "question",
            Self::Decision => "decision",
            Self::Rationale => "rationale",
            Self::Goal => "goal",
            Self::Task => "task",
            Self::Todo => "todo",
        }
    }
}

impl From<EntityKind> for NodeCategory {
    fn from(value: EntityKind) -> Self {
        match value {
            EntityKind::Concern => Self::Concern,
            EntityKind::Question => Self::Question,
            EntityKind::Decision => Self::Decision,
            EntityKind::Goal => Self::Goal,
            EntityKind::Task => Self::Task,
            EntityKind::Todo => Self::Todo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub category: NodeCategory,
    /// Multi-line display text, lines separated by `\n`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Directed graph in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl LineageGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of(&self, category: NodeCategory) -> impl Iterator<Item = &GraphNode> {
        self.nodes
            .iter()
            .filter(move |node| node.category == category)
    }

    /// Targets of edges leaving `id`, in edge order.
    pub fn successors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.source == id)
            .map(|edge| edge.target.as_str())
    }

    /// Rejects duplicate node ids and edges with a missing endpoint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(ValidationError::DuplicateNode(node.id.clone()));
            }
        }
        for edge in &self.edges {
            if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
                return Err(ValidationError::DanglingEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }
        Ok(())
    }

    fn push_node(&mut self, id: String, category: NodeCategory, label: String) {
        self.nodes.push(GraphNode {
            id,
            category,
            label,
        });
    }

    fn push_edge(&mut self, source: &str, target: &str) {
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
        });
    }
}

pub const DECISION_NODE_ID: &str = "d1";
pub const RATIONALE_NODE_ID: &str = "r1";

/// Builds the display graph of one lineage.
pub fn build_lineage_graph(lineage: &Lineage) -> LineageGraph {
    let mut graph = LineageGraph::default();
    graph.push_node(
        DECISION_NODE_ID.to_string(),
        NodeCategory::Decision,
        format!("Decision:\n{}", lineage.decision),
    );
    graph.push_node(
        RATIONALE_NODE_ID.to_string(),
        NodeCategory::Rationale,
        format!("Rationale:\n{}", lineage.rationale),
    );
    graph.push_edge(DECISION_NODE_ID, RATIONALE_NODE_ID);

    let mut concern_ids: HashMap<&str, String> = HashMap::new();
    for (idx, question) in lineage.questions.iter().enumerate() {
        let concern_id = match concern_ids.get(question.concern.as_str()) {
            Some(id) => id.clone(),
            None => {
                let id = format!("c{}", concern_ids.len() + 1);
                concern_ids.insert(question.concern.as_str(), id.clone());
                graph.push_node(
                    id.clone(),
                    NodeCategory::Concern,
                    format!("Concern:\n{}", question.concern),
                );
                id
            }
        };

        let question_id = format!("q{}", idx + 1);
        graph.push_node(
            question_id.clone(),
            NodeCategory::Question,
            format!("Question:\n{}", question.question),
        );
        graph.push_edge(&concern_id, &question_id);
        graph.push_edge(&question_id, DECISION_NODE_ID);
    }

    let mut task_counter = 0usize;
    for (idx, goal) in lineage.goals.iter().enumerate() {
        let goal_id = format!("g{}", idx + 1);
        graph.push_node(
            goal_id.clone(),
            NodeCategory::Goal,
            format!("Goal:\n{}", goal.goal),
        );
        graph.push_edge(DECISION_NODE_ID, &goal_id);

        for task in &goal.tasks {
            task_counter += 1;
            let task_id = format!("t{task_counter}");
            graph.push_node(
                task_id.clone(),
                NodeCategory::Task,
                format!("Task:\n{}\nAssignee: {}", task.task, task.assignee),
            );
            graph.push_edge(&goal_id, &task_id);
        }
    }

    graph
}

/// Display graph of one decision; empty when the decision does not exist.
pub fn lineage_graph(service: &PipelineService, decision_key: &str) -> LineageGraph {
    service
        .get_lineage(decision_key)
        .map(|lineage| build_lineage_graph(&lineage))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{GraphEdge, GraphNode, LineageGraph, NodeCategory};
    use crate::model::entity::ValidationError;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            category: NodeCategory::Goal,
            label: String::new(),
        }
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let graph = LineageGraph {
            nodes: vec![node("g1"), node("g1")],
            edges: Vec::new(),
        };
        assert_eq!(
            graph.validate(),
            Err(ValidationError::DuplicateNode("g1".to_string()))
        );
    }

    #[test]
    fn validate_rejects_dangling_edges() {
        let graph = LineageGraph {
            nodes: vec![node("g1")],
            edges: vec![GraphEdge {
                source: "g1".to_string(),
                target: "t9".to_string(),
            }],
        };
        assert!(matches!(
            graph.validate(),
            Err(ValidationError::DanglingEdge { .. })
        ));
    }
}
