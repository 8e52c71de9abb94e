//! Decision lineage queries.
//!
//! # Responsibility
//! - Collect the ancestors and descendants of one decision for rendering.
//!
//! # Invariants
//! - Questions follow the decision's own list order.
//! - Concerns appear once, in first-appearance order over the questions.
//! - Goals and tasks follow insertion order.

use crate::model::entity::{EntityKind, TaskStatus, Urgency};
use crate::service::pipeline_service::{PipelineError, PipelineResult, PipelineService};
use serde::Serialize;

/// One question cited by the decision, with its concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageQuestion {
    pub question: String,
    pub concern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageTask {
    pub task: String,
    pub assignee: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageGoal {
    pub goal: String,
    pub tasks: Vec<LineageTask>,
}

/// Snapshot of a decision's closure in the lineage chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lineage {
    pub decision: String,
    pub rationale: String,
    pub urgency: Urgency,
    pub questions: Vec<LineageQuestion>,
    pub concerns: Vec<String>,
    pub goals: Vec<LineageGoal>,
}

impl PipelineService {
    /// Returns the lineage of one decision.
    ///
    /// # Errors
    /// - `NotFound` when the decision does not exist.
    pub fn get_lineage(&self, decision_key: &str) -> PipelineResult<Lineage> {
        let decision =
            self.store
                .decision(decision_key)
                .ok_or_else(|| PipelineError::NotFound {
                    kind: EntityKind::Decision,
                    key: decision_key.to_string(),
                })?;

        let mut questions = Vec::with_capacity(decision.related_questions.len());
        let mut concerns: Vec<String> = Vec::new();
        for key in &decision.related_questions {
            let Some(question) = self.store.question(key) else {
                continue;
            };
            if !concerns.contains(&question.related_concern) {
                concerns.push(question.related_concern.clone());
            }
            questions.push(LineageQuestion {
                question: question.question.clone(),
                concern: question.related_concern.clone(),
            });
        }

        let goals = self
            .relations
            .children(EntityKind::Decision, decision_key)
            .iter()
            .filter_map(|goal_key| self.store.goal(goal_key))
            .map(|goal| LineageGoal {
                goal: goal.goal.clone(),
                tasks: self
                    .relations
                    .children(EntityKind::Goal, &goal.goal)
                    .iter()
                    .filter_map(|task_key| self.store.task(task_key))
                    .map(|task| LineageTask {
                        task: task.task.clone(),
                        assignee: task.assignee.clone(),
                        status: task.status,
                    })
                    .collect(),
            })
            .collect();

        Ok(Lineage {
            decision: decision.decision.clone(),
            rationale: decision.rationale.clone(),
            urgency: decision.urgency,
            questions,
            concerns,
            goals,
        })
    }
}
