//! Parent → child key indices over the lineage chain.
//!
//! # Responsibility
//! - Answer "which records cite this parent" without scanning collections.
//! - Mirror every Decision's question list as a Question → Decisions join.
//!
//! # Invariants
//! - Child lists keep insertion order and hold no duplicates.
//! - Parents with no children have no entry.
//! - The index only holds keys; records stay in `EntityStore`.

use crate::model::entity::EntityKind;
use crate::repo::store::EntityStore;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ChildMap {
    children: HashMap<String, Vec<String>>,
}

impl ChildMap {
    fn children(&self, parent: &str) -> &[String] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    fn link(&mut self, parent: &str, child: &str) {
        let entry = self.children.entry(parent.to_string()).or_default();
        if !entry.iter().any(|existing| existing == child) {
            entry.push(child.to_string());
        }
    }

    fn unlink(&mut self, parent: &str, child: &str) {
        if let Some(entry) = self.children.get_mut(parent) {
            entry.retain(|existing| existing != child);
            if entry.is_empty() {
                self.children.remove(parent);
            }
        }
    }

    fn rename_parent(&mut self, old: &str, new: &str) {
        if let Some(entry) = self.children.remove(old) {
            self.children.insert(new.to_string(), entry);
        }
    }

    fn rename_child(&mut self, parent: &str, old: &str, new: &str) {
        if let Some(entry) = self.children.get_mut(parent) {
            for child in entry.iter_mut().filter(|child| child.as_str() == old) {
                *child = new.to_string();
            }
        }
    }

    fn remove_parent(&mut self, parent: &str) {
        self.children.remove(parent);
    }
}

/// Incrementally maintained child indices, keyed by parent kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationIndex {
    questions_by_concern: ChildMap,
    decisions_by_question: ChildMap,
    goals_by_decision: ChildMap,
    tasks_by_goal: ChildMap,
}

impl RelationIndex {
    /// Builds the full index from a store in one pass per collection.
    pub fn build(store: &EntityStore) -> Self {
        let mut index = Self::default();
        for question in store.questions() {
            index.link(
                EntityKind::Concern,
                &question.related_concern,
                &question.question,
            );
        }
        for decision in store.decisions() {
            for question in &decision.related_questions {
                index.link(EntityKind::Question, question, &decision.decision);
            }
        }
        for goal in store.goals() {
            index.link(EntityKind::Decision, &goal.related_decision, &goal.goal);
        }
        for task in store.tasks() {
            index.link(EntityKind::Goal, &task.related_goal, &task.task);
        }
        index
    }

    /// Direct children of `parent`, where `parent_kind` is the parent's kind.
    pub fn children(&self, parent_kind: EntityKind, parent: &str) -> &[String] {
        self.map(parent_kind)
            .map(|map| map.children(parent))
            .unwrap_or(&[])
    }

    pub(crate) fn link(&mut self, parent_kind: EntityKind, parent: &str, child: &str) {
        if let Some(map) = self.map_mut(parent_kind) {
            map.link(parent, child);
        }
    }

    pub(crate) fn unlink(&mut self, parent_kind: EntityKind, parent: &str, child: &str) {
        if let Some(map) = self.map_mut(parent_kind) {
            map.unlink(parent, child);
        }
    }

    pub(crate) fn rename_parent(&mut self, parent_kind: EntityKind, old: &str, new: &str) {
        if let Some(map) = self.map_mut(parent_kind) {
            map.rename_parent(old, new);
        }
    }

    pub(crate) fn rename_child(
        &mut self,
        parent_kind: EntityKind,
        parent: &str,
        old: &str,
        new: &str,
    ) {
        if let Some(map) = self.map_mut(parent_kind) {
            map.rename_child(parent, old, new);
        }
    }

    pub(crate) fn remove_parent(&mut self, parent_kind: EntityKind, parent: &str) {
        if let Some(map) = self.map_mut(parent_kind) {
            map.remove_parent(parent);
        }
    }

    fn map(&self, parent_kind: EntityKind) -> Option<&ChildMap> {
        match parent_kind {
            EntityKind::Concern => Some(&self.questions_by_concern),
            EntityKind::Question => Some(&self.decisions_by_question),
            EntityKind::Decision => Some(&self.goals_by_decision),
            EntityKind::Goal => Some(&self.tasks_by_goal),
            EntityKind::Task | EntityKind::Todo => None,
        }
    }

    fn map_mut(&mut self, parent_kind: EntityKind) -> Option<&mut ChildMap> {
        match parent_kind {
            EntityKind::Concern => Some(&mut self.questions_by_concern),
            EntityKind::Question => Some(&mut self.decisions_by_question),
            EntityKind::Decision => Some(&mut self.goals_by_decision),
            EntityKind::Goal => Some(&mut self.tasks_by_goal),
            EntityKind::Task | EntityKind::Todo => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RelationIndex;
    use crate::model::entity::EntityKind;

    #[test]
    fn link_is_idempotent_and_unlink_drops_empty_parent() {
        let mut index = RelationIndex::default();
        index.link(EntityKind::Question, "q1", "d1");
        index.link(EntityKind::Question, "q1", "d1");
        assert_eq!(index.children(EntityKind::Question, "q1"), ["d1".to_string()]);

        index.unlink(EntityKind::Question, "q1", "d1");
        assert!(index.children(EntityKind::Question, "q1").is_empty());
        assert_eq!(index, RelationIndex::default());
    }

    #[test]
    fn rename_child_keeps_sibling_positions() {
        let mut index = RelationIndex::default();
        index.link(EntityKind::Concern, "c", "a");
        index.link(EntityKind::Concern, "c", "b");
        index.link(EntityKind::Concern, "c", "d");
        index.rename_child(EntityKind::Concern, "c", "b", "x");
        assert_eq!(
            index.children(EntityKind::Concern, "c"),
            ["a".to_string(), "x".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn leaf_kinds_have_no_children() {
        let mut index = RelationIndex::default();
        index.link(EntityKind::Task, "t", "x");
        assert!(index.children(EntityKind::Task, "t").is_empty());
        assert!(index.children(EntityKind::Todo, "t").is_empty());
    }
}
