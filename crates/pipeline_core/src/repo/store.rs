//! In-memory entity store.
//!
//! # Responsibility
//! - Own every record of the six entity kinds in insertion order.
//! - Provide keyed lookup and raw mutation primitives.
//!
//! # Invariants
//! - Keys are unique within one collection.
//! - Row order is insertion order; removals keep the relative order of
//!   survivors.
//! - No referential rules live here; `PipelineService` enforces them.

use crate::model::entity::{
    Concern, Decision, EntityKind, Goal, Keyed, Question, Record, Task, Todo, Urgency,
};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Two rows of one kind share a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub kind: EntityKind,
    pub key: String,
}

impl Display for DuplicateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate {} key `{}`", self.kind, self.key)
    }
}

impl Error for DuplicateKey {}

/// Ordered collection of records with a key → position index.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    rows: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<T: Keyed> Collection<T> {
    /// Builds a collection from rows, rejecting duplicate keys.
    pub fn from_rows(rows: Vec<T>) -> Result<Self, DuplicateKey> {
        let mut collection = Self::default();
        for row in rows {
            if collection.positions.contains_key(row.key()) {
                return Err(DuplicateKey {
                    kind: T::KIND,
                    key: row.key().to_string(),
                });
            }
            collection.push(row);
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.positions.get(key).map(|index| &self.rows[*index])
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        match self.positions.get(key) {
            Some(index) => self.rows.get_mut(*index),
            None => None,
        }
    }

    /// Appends a row. Returns `false` when the key is taken.
    pub(crate) fn push(&mut self, row: T) -> bool {
        if self.positions.contains_key(row.key()) {
            return false;
        }
        self.positions.insert(row.key().to_string(), self.rows.len());
        self.rows.push(row);
        true
    }

    /// Changes one row key in place. Returns `false` when `old` is missing
    /// or `new` is taken.
    pub(crate) fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.positions.contains_key(new) {
            return false;
        }
        let Some(index) = self.positions.remove(old) else {
            return false;
        };
        self.rows[index].set_key(new.to_string());
        self.positions.insert(new.to_string(), index);
        true
    }

    /// Removes every row whose key is in `keys`. Returns the removed count.
    ///
    /// Only rows at or after the earliest removed position are moved and
    /// reindexed, so deleting recent rows stays cheap.
    pub(crate) fn remove_keys(&mut self, keys: &HashSet<String>) -> usize {
        let Some(first) = keys
            .iter()
            .filter_map(|key| self.positions.remove(key))
            .min()
        else {
            return 0;
        };

        let mut tail = self.rows.split_off(first);
        let tail_before = tail.len();
        tail.retain(|row| !keys.contains(row.key()));
        for (offset, row) in tail.iter().enumerate() {
            if let Some(index) = self.positions.get_mut(row.key()) {
                *index = first + offset;
            }
        }
        let removed = tail_before - tail.len();
        self.rows.append(&mut tail);
        removed
    }
}

/// Plain row lists used to build or dump a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRows {
    pub concerns: Vec<Concern>,
    pub questions: Vec<Question>,
    pub decisions: Vec<Decision>,
    pub goals: Vec<Goal>,
    pub tasks: Vec<Task>,
    pub todos: Vec<Todo>,
}

/// Single owner of all pipeline records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    concerns: Collection<Concern>,
    questions: Collection<Question>,
    decisions: Collection<Decision>,
    goals: Collection<Goal>,
    tasks: Collection<Task>,
    todos: Collection<Todo>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from complete row lists, rejecting duplicate keys.
    ///
    /// Parent references are not checked here.
    pub fn from_rows(rows: StoreRows) -> Result<Self, DuplicateKey> {
        Ok(Self {
            concerns: Collection::from_rows(rows.concerns)?,
            questions: Collection::from_rows(rows.questions)?,
            decisions: Collection::from_rows(rows.decisions)?,
            goals: Collection::from_rows(rows.goals)?,
            tasks: Collection::from_rows(rows.tasks)?,
            todos: Collection::from_rows(rows.todos)?,
        })
    }

    /// Copies every collection into plain row lists.
    pub fn to_rows(&self) -> StoreRows {
        StoreRows {
            concerns: self.concerns.rows().to_vec(),
            questions: self.questions.rows().to_vec(),
            decisions: self.decisions.rows().to_vec(),
            goals: self.goals.rows().to_vec(),
            tasks: self.tasks.rows().to_vec(),
            todos: self.todos.rows().to_vec(),
        }
    }

    pub fn concerns(&self) -> &[Concern] {
        self.concerns.rows()
    }

    pub fn questions(&self) -> &[Question] {
        self.questions.rows()
    }

    pub fn decisions(&self) -> &[Decision] {
        self.decisions.rows()
    }

    pub fn goals(&self) -> &[Goal] {
        self.goals.rows()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.rows()
    }

    pub fn todos(&self) -> &[Todo] {
        self.todos.rows()
    }

    pub fn concern(&self, key: &str) -> Option<&Concern> {
        self.concerns.get(key)
    }

    pub fn question(&self, key: &str) -> Option<&Question> {
        self.questions.get(key)
    }

    pub fn decision(&self, key: &str) -> Option<&Decision> {
        self.decisions.get(key)
    }

    pub fn goal(&self, key: &str) -> Option<&Goal> {
        self.goals.get(key)
    }

    pub fn task(&self, key: &str) -> Option<&Task> {
        self.tasks.get(key)
    }

    pub fn todo(&self, key: &str) -> Option<&Todo> {
        self.todos.get(key)
    }

    pub fn contains(&self, kind: EntityKind, key: &str) -> bool {
        match kind {
            EntityKind::Concern => self.concerns.contains(key),
            EntityKind::Question => self.questions.contains(key),
            EntityKind::Decision => self.decisions.contains(key),
            EntityKind::Goal => self.goals.contains(key),
            EntityKind::Task => self.tasks.contains(key),
            EntityKind::Todo => self.todos.contains(key),
        }
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Concern => self.concerns.len(),
            EntityKind::Question => self.questions.len(),
            EntityKind::Decision => self.decisions.len(),
            EntityKind::Goal => self.goals.len(),
            EntityKind::Task => self.tasks.len(),
            EntityKind::Todo => self.todos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Copies one record out as a tagged `Record`.
    pub fn record(&self, kind: EntityKind, key: &str) -> Option<Record> {
        match kind {
            EntityKind::Concern => self.concerns.get(key).cloned().map(Record::Concern),
            EntityKind::Question => self.questions.get(key).cloned().map(Record::Question),
            EntityKind::Decision => self.decisions.get(key).cloned().map(Record::Decision),
            EntityKind::Goal => self.goals.get(key).cloned().map(Record::Goal),
            EntityKind::Task => self.tasks.get(key).cloned().map(Record::Task),
            EntityKind::Todo => self.todos.get(key).cloned().map(Record::Todo),
        }
    }

    /// Copies every record of one kind out, in store order.
    pub fn records(&self, kind: EntityKind) -> Vec<Record> {
        match kind {
            EntityKind::Concern => self.concerns().iter().cloned().map(Record::Concern).collect(),
            EntityKind::Question => self
                .questions()
                .iter()
                .cloned()
                .map(Record::Question)
                .collect(),
            EntityKind::Decision => self
                .decisions()
                .iter()
                .cloned()
                .map(Record::Decision)
                .collect(),
            EntityKind::Goal => self.goals().iter().cloned().map(Record::Goal).collect(),
            EntityKind::Task => self.tasks().iter().cloned().map(Record::Task).collect(),
            EntityKind::Todo => self.todos().iter().cloned().map(Record::Todo).collect(),
        }
    }

    /// Parent keys of one record; empty when the record is missing.
    pub fn parent_keys(&self, kind: EntityKind, key: &str) -> Vec<String> {
        match kind {
            EntityKind::Question => self
                .question(key)
                .map(|row| vec![row.related_concern.clone()])
                .unwrap_or_default(),
            EntityKind::Decision => self
                .decision(key)
                .map(|row| row.related_questions.clone())
                .unwrap_or_default(),
            EntityKind::Goal => self
                .goal(key)
                .map(|row| vec![row.related_decision.clone()])
                .unwrap_or_default(),
            EntityKind::Task => self
                .task(key)
                .map(|row| vec![row.related_goal.clone()])
                .unwrap_or_default(),
            EntityKind::Concern | EntityKind::Todo => Vec::new(),
        }
    }

    pub(crate) fn insert_concern(&mut self, row: Concern) -> bool {
        self.concerns.push(row)
    }

    pub(crate) fn insert_question(&mut self, row: Question) -> bool {
        self.questions.push(row)
    }

    pub(crate) fn insert_decision(&mut self, row: Decision) -> bool {
        self.decisions.push(row)
    }

    pub(crate) fn insert_goal(&mut self, row: Goal) -> bool {
        self.goals.push(row)
    }

    pub(crate) fn insert_task(&mut self, row: Task) -> bool {
        self.tasks.push(row)
    }

    pub(crate) fn insert_todo(&mut self, row: Todo) -> bool {
        self.todos.push(row)
    }

    pub(crate) fn question_mut(&mut self, key: &str) -> Option<&mut Question> {
        self.questions.get_mut(key)
    }

    pub(crate) fn decision_mut(&mut self, key: &str) -> Option<&mut Decision> {
        self.decisions.get_mut(key)
    }

    pub(crate) fn goal_mut(&mut self, key: &str) -> Option<&mut Goal> {
        self.goals.get_mut(key)
    }

    pub(crate) fn task_mut(&mut self, key: &str) -> Option<&mut Task> {
        self.tasks.get_mut(key)
    }

    pub(crate) fn todo_mut(&mut self, key: &str) -> Option<&mut Todo> {
        self.todos.get_mut(key)
    }

    pub(crate) fn rename_key(&mut self, kind: EntityKind, old: &str, new: &str) -> bool {
        match kind {
            EntityKind::Concern => self.concerns.rename(old, new),
            EntityKind::Question => self.questions.rename(old, new),
            EntityKind::Decision => self.decisions.rename(old, new),
            EntityKind::Goal => self.goals.rename(old, new),
            EntityKind::Task => self.tasks.rename(old, new),
            EntityKind::Todo => self.todos.rename(old, new),
        }
    }

    /// Overwrites urgency (importance for todos). Returns `false` when missing.
    pub(crate) fn set_urgency(&mut self, kind: EntityKind, key: &str, urgency: Urgency) -> bool {
        let slot = match kind {
            EntityKind::Concern => self.concerns.get_mut(key).map(|row| &mut row.urgency),
            EntityKind::Question => self.questions.get_mut(key).map(|row| &mut row.urgency),
            EntityKind::Decision => self.decisions.get_mut(key).map(|row| &mut row.urgency),
            EntityKind::Goal => self.goals.get_mut(key).map(|row| &mut row.urgency),
            EntityKind::Task => self.tasks.get_mut(key).map(|row| &mut row.urgency),
            EntityKind::Todo => self.todos.get_mut(key).map(|row| &mut row.importance),
        };
        match slot {
            Some(slot) => {
                *slot = urgency;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_keys(&mut self, kind: EntityKind, keys: &HashSet<String>) -> usize {
        match kind {
            EntityKind::Concern => self.concerns.remove_keys(keys),
            EntityKind::Question => self.questions.remove_keys(keys),
            EntityKind::Decision => self.decisions.remove_keys(keys),
            EntityKind::Goal => self.goals.remove_keys(keys),
            EntityKind::Task => self.tasks.remove_keys(keys),
            EntityKind::Todo => self.todos.remove_keys(keys),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, DuplicateKey};
    use crate::model::entity::{Concern, EntityKind, Urgency};
    use std::collections::HashSet;

    fn concern(key: &str) -> Concern {
        Concern {
            concern: key.to_string(),
            urgency: Urgency::NEUTRAL,
            created_at: 0,
        }
    }

    #[test]
    fn from_rows_rejects_duplicate_keys() {
        let err = Collection::from_rows(vec![concern("a"), concern("a")]).unwrap_err();
        assert_eq!(
            err,
            DuplicateKey {
                kind: EntityKind::Concern,
                key: "a".to_string()
            }
        );
    }

    #[test]
    fn remove_keys_keeps_survivor_order_and_index() {
        let mut collection =
            Collection::from_rows(vec![concern("a"), concern("b"), concern("c")]).unwrap();
        let removed = collection.remove_keys(&HashSet::from(["b".to_string()]));
        assert_eq!(removed, 1);
        let keys: Vec<&str> = collection
            .rows()
            .iter()
            .map(|row| row.concern.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(collection.get("c").unwrap().concern, "c");
    }

    #[test]
    fn remove_keys_shifts_only_later_positions() {
        let mut collection = Collection::from_rows(vec![
            concern("a"),
            concern("b"),
            concern("c"),
            concern("d"),
            concern("e"),
        ])
        .expect("distinct keys should build a collection");

        let removed = collection.remove_keys(&HashSet::from([
            "d".to_string(),
            "b".to_string(),
            "absent".to_string(),
        ]));
        assert_eq!(removed, 2);
        assert_eq!(collection.positions.get("a"), Some(&0));
        assert_eq!(collection.positions.get("c"), Some(&1));
        assert_eq!(collection.positions.get("e"), Some(&2));
        assert_eq!(collection.positions.len(), 3);

        assert_eq!(collection.remove_keys(&HashSet::from(["e".to_string()])), 1);
        assert_eq!(collection.remove_keys(&HashSet::from(["zzz".to_string()])), 0);
        let keys: Vec<&str> = collection
            .rows()
            .iter()
            .map(|row| row.concern.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn rename_refuses_taken_key() {
        let mut collection = Collection::from_rows(vec![concern("a"), concern("b")]).unwrap();
        assert!(!collection.rename("a", "b"));
        assert!(collection.rename("a", "z"));
        assert!(collection.contains("z"));
        assert!(!collection.contains("a"));
    }
}
