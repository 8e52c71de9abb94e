//! Fill colors per node category.

use crate::graph::builder::NodeCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub concern: String,
    pub question: String,
    pub decision: String,
    pub rationale: String,
    pub goal: String,
    pub task: String,
    pub todo: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            concern: "#FCB0B3".to_string(),
            question: "#F93943".to_string(),
            decision: "#D1F5FF".to_string(),
            rationale: "#F4E409".to_string(),
            goal: "#FFBE0B".to_string(),
            task: "#E3D985".to_string(),
            todo: "#B5E2D0".to_string(),
        }
    }
}

impl Palette {
    pub fn fill(&self, category: NodeCategory) -> &str {
        match category {
            NodeCategory::Concern => &self.concern,
            NodeCategory::Question => &self.question,
            NodeCategory::Decision => &self.decision,
            NodeCategory::Rationale => &self.rationale,
            NodeCategory::Goal => &self.goal,
            NodeCategory::Task => &self.task,
            NodeCategory::Todo => &self.todo,
        }
    }
}
