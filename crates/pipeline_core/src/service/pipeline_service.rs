//! Relationship graph engine.
//!
//! # Responsibility
//! - Validate and apply every mutation of the entity store.
//! - Cascade key renames to referencing fields and deletes to descendants.
//! - Keep `RelationIndex` in step with the store.
//!
//! # Invariants
//! - Validate-then-commit: an operation that returns `Err` has not touched
//!   the store or the index.
//! - Non-root lineage records always reference existing parents.
//! - A cascade deletes each record at most once, however many parents
//!   reach it.
//! - A decision citing a deleted question is deleted in full.

use crate::model::entity::{
    normalize_categories, require_text, Concern, Decision, EntityKind, Goal, Question, Record,
    Task, TaskStatus, Todo, Urgency, ValidationError,
};
use crate::repo::relations::RelationIndex;
use crate::repo::store::EntityStore;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Recoverable engine error; the caller may retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Validation(ValidationError),
    /// Target or referenced key does not exist.
    NotFound { kind: EntityKind, key: String },
    /// Key already taken within its kind.
    Conflict { kind: EntityKind, key: String },
}

impl PipelineError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
        }
    }

    fn not_found(kind: EntityKind, key: &str) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, key } => write!(f, "{kind} not found: `{key}`"),
            Self::Conflict { kind, key } => write!(f, "{kind} already exists: `{key}`"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for PipelineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Optional field changes for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Optional field changes for one todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub details: Option<String>,
    pub categories: Option<Vec<String>>,
    pub importance: Option<i64>,
}

/// Engine facade owning the entity store and its relation indices.
#[derive(Debug, Clone, Default)]
pub struct PipelineService {
    pub(crate) store: EntityStore,
    pub(crate) relations: RelationIndex,
}

impl PipelineService {
    /// Creates an engine over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine over a complete store after checking its references.
    pub fn from_store(store: EntityStore) -> PipelineResult<Self> {
        check_integrity(&store)?;
        let relations = RelationIndex::build(&store);
        Ok(Self { store, relations })
    }

    /// Read access to every record.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    /// Copies one record out, if present.
    pub fn entity(&self, kind: EntityKind, key: &str) -> Option<Record> {
        self.store.record(kind, key)
    }

    /// Swaps in a complete store, all or nothing.
    ///
    /// # Errors
    /// - `NotFound` when any record references a missing parent.
    /// - `Validation` when a decision has no or duplicate questions.
    pub fn replace_store(&mut self, store: EntityStore) -> PipelineResult<()> {
        if let Err(err) = check_integrity(&store) {
            warn!(
                "event=store_replace module=pipeline status=rejected error_code={}",
                err.code()
            );
            return Err(err);
        }
        self.relations = RelationIndex::build(&store);
        self.store = store;
        info!(
            "event=store_replace module=pipeline status=ok concerns={} questions={} decisions={} goals={} tasks={} todos={}",
            self.store.len(EntityKind::Concern),
            self.store.len(EntityKind::Question),
            self.store.len(EntityKind::Decision),
            self.store.len(EntityKind::Goal),
            self.store.len(EntityKind::Task),
            self.store.len(EntityKind::Todo),
        );
        Ok(())
    }

    pub fn add_concern(
        &mut self,
        text: impl Into<String>,
        urgency: i64,
    ) -> PipelineResult<Concern> {
        let kind = EntityKind::Concern;
        let concern = text.into();
        let checked = self.check_new_record(kind, &concern, urgency);
        let urgency = log_rejection("entity_add", kind, checked)?;

        let record = Concern {
            concern,
            urgency,
            created_at: now_epoch_ms(),
        };
        self.store.insert_concern(record.clone());
        log_added(kind);
        Ok(record)
    }

    pub fn add_question(
        &mut self,
        text: impl Into<String>,
        concern_key: impl Into<String>,
        urgency: i64,
    ) -> PipelineResult<Question> {
        let kind = EntityKind::Question;
        let question = text.into();
        let checked = self
            .check_new_record(kind, &question, urgency)
            .and_then(|urgency| {
                let parents = self.check_parents(kind, vec![concern_key.into()])?;
                Ok((urgency, parents))
            });
        let (urgency, mut parents) = log_rejection("entity_add", kind, checked)?;
        let related_concern = parents.remove(0);

        self.relations
            .link(EntityKind::Concern, &related_concern, &question);
        let record = Question {
            question,
            related_concern,
            urgency,
            created_at: now_epoch_ms(),
        };
        self.store.insert_question(record.clone());
        log_added(kind);
        Ok(record)
    }

    /// Adds a decision citing one or more existing questions.
    pub fn add_decision<I, S>(
        &mut self,
        text: impl Into<String>,
        rationale: impl Into<String>,
        question_keys: I,
        urgency: i64,
    ) -> PipelineResult<Decision>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = EntityKind::Decision;
        let decision = text.into();
        let rationale = rationale.into();
        let question_keys: Vec<String> = question_keys.into_iter().map(Into::into).collect();
        let checked = self
            .check_new_record(kind, &decision, urgency)
            .and_then(|urgency| {
                require_text(kind, "rationale", &rationale)?;
                let parents = self.check_parents(kind, question_keys)?;
                Ok((urgency, parents))
            });
        let (urgency, related_questions) = log_rejection("entity_add", kind, checked)?;

        for question in &related_questions {
            self.relations
                .link(EntityKind::Question, question, &decision);
        }
        let record = Decision {
            decision,
            rationale,
            related_questions,
            urgency,
            created_at: now_epoch_ms(),
        };
        self.store.insert_decision(record.clone());
        log_added(kind);
        Ok(record)
    }

    pub fn add_goal(
        &mut self,
        text: impl Into<String>,
        decision_key: impl Into<String>,
        urgency: i64,
    ) -> PipelineResult<Goal> {
        let kind = EntityKind::Goal;
        let goal = text.into();
        let checked = self
            .check_new_record(kind, &goal, urgency)
            .and_then(|urgency| {
                let parents = self.check_parents(kind, vec![decision_key.into()])?;
                Ok((urgency, parents))
            });
        let (urgency, mut parents) = log_rejection("entity_add", kind, checked)?;
        let related_decision = parents.remove(0);

        self.relations
            .link(EntityKind::Decision, &related_decision, &goal);
        let record = Goal {
            goal,
            related_decision,
            urgency,
            created_at: now_epoch_ms(),
        };
        self.store.insert_goal(record.clone());
        log_added(kind);
        Ok(record)
    }

    /// Adds a task in `Not Started` state.
    pub fn add_task(
        &mut self,
        text: impl Into<String>,
        assignee: impl Into<String>,
        goal_key: impl Into<String>,
        urgency: i64,
    ) -> PipelineResult<Task> {
        let kind = EntityKind::Task;
        let task = text.into();
        let assignee = assignee.into();
        let checked = self
            .check_new_record(kind, &task, urgency)
            .and_then(|urgency| {
                require_text(kind, "assignee", &assignee)?;
                let parents = self.check_parents(kind, vec![goal_key.into()])?;
                Ok((urgency, parents))
            });
        let (urgency, mut parents) = log_rejection("entity_add", kind, checked)?;
        let related_goal = parents.remove(0);

        self.relations.link(EntityKind::Goal, &related_goal, &task);
        let record = Task {
            task,
            assignee,
            related_goal,
            status: TaskStatus::default(),
            urgency,
            created_at: now_epoch_ms(),
        };
        self.store.insert_task(record.clone());
        log_added(kind);
        Ok(record)
    }

    /// Adds a standalone todo. `details` may be empty.
    pub fn add_todo<I, S>(
        &mut self,
        title: impl Into<String>,
        details: impl Into<String>,
        categories: I,
        importance: i64,
    ) -> PipelineResult<Todo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = EntityKind::Todo;
        let title = title.into();
        let checked = self.check_new_record(kind, &title, importance);
        let importance = log_rejection("entity_add", kind, checked)?;

        let record = Todo {
            title,
            details: details.into(),
            categories: normalize_categories(categories),
            importance,
            created_at: now_epoch_ms(),
        };
        self.store.insert_todo(record.clone());
        log_added(kind);
        Ok(record)
    }

    /// Renames one record and rewrites every reference to it.
    ///
    /// Renaming a key to itself is a no-op.
    ///
    /// # Errors
    /// - `NotFound` when `old_key` is absent.
    /// - `Validation` when `new_key` is blank.
    /// - `Conflict` when `new_key` is already used by another record.
    pub fn rename_entity(
        &mut self,
        kind: EntityKind,
        old_key: &str,
        new_key: impl Into<String>,
    ) -> PipelineResult<()> {
        let new_key = new_key.into();
        let checked = self.check_rename(kind, old_key, &new_key);
        log_rejection("entity_rename", kind, checked)?;
        if old_key == new_key {
            return Ok(());
        }

        let parents = self.store.parent_keys(kind, old_key);
        let children = self.relations.children(kind, old_key).to_vec();
        self.store.rename_key(kind, old_key, &new_key);

        for child in &children {
            match kind {
                EntityKind::Concern => {
                    if let Some(question) = self.store.question_mut(child) {
                        question.related_concern = new_key.clone();
                    }
                }
                EntityKind::Question => {
                    if let Some(decision) = self.store.decision_mut(child) {
                        for question in decision
                            .related_questions
                            .iter_mut()
                            .filter(|question| question.as_str() == old_key)
                        {
                            *question = new_key.clone();
                        }
                    }
                }
                EntityKind::Decision => {
                    if let Some(goal) = self.store.goal_mut(child) {
                        goal.related_decision = new_key.clone();
                    }
                }
                EntityKind::Goal => {
                    if let Some(task) = self.store.task_mut(child) {
                        task.related_goal = new_key.clone();
                    }
                }
                EntityKind::Task | EntityKind::Todo => {}
            }
        }

        self.relations.rename_parent(kind, old_key, &new_key);
        if let Some(parent_kind) = kind.parent_kind() {
            for parent in &parents {
                self.relations
                    .rename_child(parent_kind, parent, old_key, &new_key);
            }
        }

        info!(
            "event=entity_rename module=pipeline status=ok kind={} dependents={}",
            kind,
            children.len()
        );
        Ok(())
    }

    /// Points one record at new parents. Decisions get their question list
    /// replaced wholesale.
    ///
    /// # Errors
    /// - `Validation` for concerns/todos, wrong parent count, blank or
    ///   duplicate parent keys.
    /// - `NotFound` when the record or any new parent is absent.
    pub fn reparent_entity<I, S>(
        &mut self,
        kind: EntityKind,
        key: &str,
        new_parent_keys: I,
    ) -> PipelineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let new_parent_keys: Vec<String> = new_parent_keys.into_iter().map(Into::into).collect();
        let checked = self.check_reparent(kind, key, new_parent_keys);
        let (parent_kind, new_parents) = log_rejection("entity_reparent", kind, checked)?;

        for parent in self.store.parent_keys(kind, key) {
            self.relations.unlink(parent_kind, &parent, key);
        }
        for parent in &new_parents {
            self.relations.link(parent_kind, parent, key);
        }

        match kind {
            EntityKind::Question => {
                if let Some(question) = self.store.question_mut(key) {
                    question.related_concern = new_parents[0].clone();
                }
            }
            EntityKind::Decision => {
                if let Some(decision) = self.store.decision_mut(key) {
                    decision.related_questions = new_parents;
                }
            }
            EntityKind::Goal => {
                if let Some(goal) = self.store.goal_mut(key) {
                    goal.related_decision = new_parents[0].clone();
                }
            }
            EntityKind::Task => {
                if let Some(task) = self.store.task_mut(key) {
                    task.related_goal = new_parents[0].clone();
                }
            }
            EntityKind::Concern | EntityKind::Todo => {}
        }

        info!(
            "event=entity_reparent module=pipeline status=ok kind={}",
            kind
        );
        Ok(())
    }

    /// Deletes one record and its whole descendant subtree.
    ///
    /// Returns `false` without side effects when the key is absent.
    pub fn delete_entity(&mut self, kind: EntityKind, key: &str) -> bool {
        if !self.store.contains(kind, key) {
            return false;
        }

        let plan = self.plan_cascade(kind, key);

        for plan_kind in EntityKind::ALL {
            let Some(parent_kind) = plan_kind.parent_kind() else {
                continue;
            };
            for doomed in plan.keys(plan_kind) {
                for parent in self.store.parent_keys(plan_kind, doomed) {
                    self.relations.unlink(parent_kind, &parent, doomed);
                }
            }
        }
        for plan_kind in EntityKind::ALL {
            for doomed in plan.keys(plan_kind) {
                self.relations.remove_parent(plan_kind, doomed);
            }
        }

        let removed: usize = EntityKind::ALL
            .iter()
            .map(|plan_kind| self.store.remove_keys(*plan_kind, plan.keys(*plan_kind)))
            .sum();

        info!(
            "event=entity_delete module=pipeline status=ok kind={} removed={}",
            kind, removed
        );
        true
    }

    /// Sets urgency, or importance for todos.
    pub fn set_urgency(&mut self, kind: EntityKind, key: &str, urgency: i64) -> PipelineResult<()> {
        let checked = Urgency::for_field(kind.urgency_field(), urgency)
            .map_err(PipelineError::from)
            .and_then(|urgency| {
                if self.store.contains(kind, key) {
                    Ok(urgency)
                } else {
                    Err(PipelineError::not_found(kind, key))
                }
            });
        let urgency = log_rejection("entity_update", kind, checked)?;
        self.store.set_urgency(kind, key, urgency);
        log_updated(kind);
        Ok(())
    }

    /// Replaces one decision's rationale.
    pub fn update_rationale(
        &mut self,
        decision_key: &str,
        rationale: impl Into<String>,
    ) -> PipelineResult<()> {
        let kind = EntityKind::Decision;
        let rationale = rationale.into();
        let checked = require_text(kind, "rationale", &rationale)
            .map_err(PipelineError::from)
            .and_then(|()| self.require_existing(kind, decision_key));
        log_rejection("entity_update", kind, checked)?;

        if let Some(decision) = self.store.decision_mut(decision_key) {
            decision.rationale = rationale;
        }
        log_updated(kind);
        Ok(())
    }

    /// Applies assignee/status changes to one task.
    pub fn update_task(&mut self, task_key: &str, update: TaskUpdate) -> PipelineResult<()> {
        let kind = EntityKind::Task;
        let checked = self.require_existing(kind, task_key).and_then(|()| {
            if let Some(assignee) = &update.assignee {
                require_text(kind, "assignee", assignee)?;
            }
            Ok(())
        });
        log_rejection("entity_update", kind, checked)?;

        if let Some(task) = self.store.task_mut(task_key) {
            if let Some(assignee) = update.assignee {
                task.assignee = assignee;
            }
            if let Some(status) = update.status {
                task.status = status;
            }
        }
        log_updated(kind);
        Ok(())
    }

    /// Applies details/categories/importance changes to one todo.
    pub fn update_todo(&mut self, title: &str, update: TodoUpdate) -> PipelineResult<()> {
        let kind = EntityKind::Todo;
        let checked = self.require_existing(kind, title).and_then(|()| {
            update
                .importance
                .map(|value| Urgency::for_field("importance", value))
                .transpose()
                .map_err(PipelineError::from)
        });
        let importance = log_rejection("entity_update", kind, checked)?;

        if let Some(todo) = self.store.todo_mut(title) {
            if let Some(details) = update.details {
                todo.details = details;
            }
            if let Some(categories) = update.categories {
                todo.categories = normalize_categories(categories);
            }
            if let Some(importance) = importance {
                todo.importance = importance;
            }
        }
        log_updated(kind);
        Ok(())
    }

    fn require_existing(&self, kind: EntityKind, key: &str) -> PipelineResult<()> {
        if self.store.contains(kind, key) {
            Ok(())
        } else {
            Err(PipelineError::not_found(kind, key))
        }
    }

    fn check_new_record(
        &self,
        kind: EntityKind,
        key: &str,
        urgency: i64,
    ) -> PipelineResult<Urgency> {
        require_text(kind, kind.key_field(), key)?;
        let urgency = Urgency::for_field(kind.urgency_field(), urgency)?;
        if self.store.contains(kind, key) {
            return Err(PipelineError::Conflict {
                kind,
                key: key.to_string(),
            });
        }
        Ok(urgency)
    }

    /// Checks parent keys for a new record. A missing parent is a
    /// validation failure here, unlike reparenting.
    fn check_parents(&self, kind: EntityKind, keys: Vec<String>) -> PipelineResult<Vec<String>> {
        let (parent_kind, keys) = check_parent_shape(kind, keys)?;
        if let Some(missing) = self.first_missing(parent_kind, &keys) {
            return Err(ValidationError::UnknownParent {
                kind: parent_kind,
                key: missing.to_string(),
            }
            .into());
        }
        Ok(keys)
    }

    fn first_missing<'a>(&self, parent_kind: EntityKind, keys: &'a [String]) -> Option<&'a str> {
        keys.iter()
            .map(String::as_str)
            .find(|key| !self.store.contains(parent_kind, key))
    }

    fn check_rename(&self, kind: EntityKind, old_key: &str, new_key: &str) -> PipelineResult<()> {
        self.require_existing(kind, old_key)?;
        require_text(kind, kind.key_field(), new_key)?;
        if old_key != new_key && self.store.contains(kind, new_key) {
            return Err(PipelineError::Conflict {
                kind,
                key: new_key.to_string(),
            });
        }
        Ok(())
    }

    fn check_reparent(
        &self,
        kind: EntityKind,
        key: &str,
        new_parent_keys: Vec<String>,
    ) -> PipelineResult<(EntityKind, Vec<String>)> {
        if kind.parent_kind().is_none() {
            return Err(ValidationError::NoParentLink { kind }.into());
        }
        self.require_existing(kind, key)?;
        let (parent_kind, parents) = check_parent_shape(kind, new_parent_keys)?;
        if let Some(missing) = self.first_missing(parent_kind, &parents) {
            return Err(PipelineError::not_found(parent_kind, missing));
        }
        Ok((parent_kind, parents))
    }

    /// Collects the record and every transitive descendant with an explicit
    /// depth-first walk over the relation index.
    fn plan_cascade(&self, kind: EntityKind, key: &str) -> CascadePlan {
        let mut plan = CascadePlan::default();
        let mut stack = vec![(kind, key.to_string())];
        while let Some((current_kind, current_key)) = stack.pop() {
            let Some(child_kind) = current_kind.child_kind() else {
                plan.insert(current_kind, current_key);
                continue;
            };
            for child in self.relations.children(current_kind, &current_key) {
                if !plan.contains(child_kind, child) {
                    stack.push((child_kind, child.clone()));
                }
            }
            plan.insert(current_kind, current_key);
        }
        plan
    }
}

/// Keys scheduled for deletion, one set per kind.
#[derive(Debug, Default)]
struct CascadePlan {
    keys: [HashSet<String>; 6],
}

impl CascadePlan {
    fn slot(kind: EntityKind) -> usize {
        match kind {
            EntityKind::Concern => 0,
            EntityKind::Question => 1,
            EntityKind::Decision => 2,
            EntityKind::Goal => 3,
            EntityKind::Task => 4,
            EntityKind::Todo => 5,
        }
    }

    fn insert(&mut self, kind: EntityKind, key: String) -> bool {
        self.keys[Self::slot(kind)].insert(key)
    }

    fn contains(&self, kind: EntityKind, key: &str) -> bool {
        self.keys[Self::slot(kind)].contains(key)
    }

    fn keys(&self, kind: EntityKind) -> &HashSet<String> {
        &self.keys[Self::slot(kind)]
    }
}

/// Checks arity, blanks and duplicates of parent keys and resolves the
/// parent kind.
fn check_parent_shape(
    kind: EntityKind,
    keys: Vec<String>,
) -> PipelineResult<(EntityKind, Vec<String>)> {
    let parent_kind = kind
        .parent_kind()
        .ok_or(ValidationError::NoParentLink { kind })?;
    let field = kind.parent_field().unwrap_or("parent");

    if keys.is_empty() {
        return Err(ValidationError::MissingParent { kind }.into());
    }
    if kind != EntityKind::Decision && keys.len() != 1 {
        return Err(ValidationError::ParentArity {
            kind,
            expected: 1,
            actual: keys.len(),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for key in &keys {
        require_text(kind, field, key)?;
        if !seen.insert(key.as_str()) {
            return Err(ValidationError::DuplicateParent {
                kind,
                key: key.clone(),
            }
            .into());
        }
    }
    Ok((parent_kind, keys))
}

/// Checks that every parent reference in `store` resolves.
fn check_integrity(store: &EntityStore) -> PipelineResult<()> {
    for question in store.questions() {
        if store.concern(&question.related_concern).is_none() {
            return Err(PipelineError::not_found(
                EntityKind::Concern,
                &question.related_concern,
            ));
        }
    }
    for decision in store.decisions() {
        if decision.related_questions.is_empty() {
            return Err(ValidationError::MissingParent {
                kind: EntityKind::Decision,
            }
            .into());
        }
        let mut seen = HashSet::new();
        for question in &decision.related_questions {
            if !seen.insert(question.as_str()) {
                return Err(ValidationError::DuplicateParent {
                    kind: EntityKind::Decision,
                    key: question.clone(),
                }
                .into());
            }
            if store.question(question).is_none() {
                return Err(PipelineError::not_found(EntityKind::Question, question));
            }
        }
    }
    for goal in store.goals() {
        if store.decision(&goal.related_decision).is_none() {
            return Err(PipelineError::not_found(
                EntityKind::Decision,
                &goal.related_decision,
            ));
        }
    }
    for task in store.tasks() {
        if store.goal(&task.related_goal).is_none() {
            return Err(PipelineError::not_found(EntityKind::Goal, &task.related_goal));
        }
    }
    Ok(())
}

fn log_rejection<T>(
    event: &str,
    kind: EntityKind,
    result: PipelineResult<T>,
) -> PipelineResult<T> {
    if let Err(err) = &result {
        warn!(
            "event={} module=pipeline status=rejected kind={} error_code={}",
            event,
            kind,
            err.code()
        );
    }
    result
}

fn log_added(kind: EntityKind) {
    info!("event=entity_add module=pipeline status=ok kind={}", kind);
}

fn log_updated(kind: EntityKind) {
    info!("event=entity_update module=pipeline status=ok kind={}", kind);
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{CascadePlan, PipelineService};
    use crate::model::entity::EntityKind;

    #[test]
    fn cascade_plan_visits_shared_descendants_once() {
        let mut service = PipelineService::new();
        service.add_concern("c", 50).unwrap();
        service.add_question("q1", "c", 50).unwrap();
        service.add_question("q2", "c", 50).unwrap();
        service.add_decision("d", "r", ["q1", "q2"], 50).unwrap();
        service.add_goal("g", "d", 50).unwrap();

        let plan = service.plan_cascade(EntityKind::Concern, "c");
        assert_eq!(plan.keys(EntityKind::Question).len(), 2);
        assert_eq!(plan.keys(EntityKind::Decision).len(), 1);
        assert!(plan.contains(EntityKind::Goal, "g"));
    }

    #[test]
    fn cascade_plan_slots_are_distinct() {
        let mut plan = CascadePlan::default();
        for kind in EntityKind::ALL {
            assert!(plan.insert(kind, "same".to_string()));
        }
        for kind in EntityKind::ALL {
            assert_eq!(plan.keys(kind).len(), 1);
        }
    }
}
