//! Pipeline entity records.
//!
//! # Responsibility
//! - Define one fixed-shape record per entity kind.
//! - Validate scalar fields (blank text, urgency range) before records exist.
//!
//! # Invariants
//! - Key text is stored exactly as entered; "blank" means empty after trim.
//! - `Urgency` always holds a value in `1..=100`; out-of-range input is an
//!   error, never clamped.
//! - Task status defaults to `Not Started`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted urgency/importance value.
pub const URGENCY_MIN: i64 = 1;
/// Highest accepted urgency/importance value.
pub const URGENCY_MAX: i64 = 100;

/// The six record kinds held by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Concern,
    Question,
    Decision,
    Goal,
    Task,
    /// Standalone item, never part of the lineage graph.
    Todo,
}

impl EntityKind {
    /// All kinds, lineage order first.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Concern,
        EntityKind::Question,
        EntityKind::Decision,
        EntityKind::Goal,
        EntityKind::Task,
        EntityKind::Todo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concern => "concern",
            Self::Question => "question",
            Self::Decision => "decision",
            Self::Goal => "goal",
            Self::Task => "task",
            Self::Todo => "todo",
        }
    }

    /// Name of the unique key field for this kind.
    pub fn key_field(self) -> &'static str {
        match self {
            Self::Todo => "title",
            other => other.as_str(),
        }
    }

    /// Name of the field holding parent references, if the kind has parents.
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            Self::Question => Some("related_concern"),
            Self::Decision => Some("related_questions"),
            Self::Goal => Some("related_decision"),
            Self::Task => Some("related_goal"),
            Self::Concern | Self::Todo => None,
        }
    }

    /// Kind one level up the lineage chain.
    pub fn parent_kind(self) -> Option<EntityKind> {
        match self {
            Self::Question => Some(Self::Concern),
            Self::Decision => Some(Self::Question),
            Self::Goal => Some(Self::Decision),
            Self::Task => Some(Self::Goal),
            Self::Concern | Self::Todo => None,
        }
    }

    /// Kind one level down the lineage chain.
    pub fn child_kind(self) -> Option<EntityKind> {
        match self {
            Self::Concern => Some(Self::Question),
            Self::Question => Some(Self::Decision),
            Self::Decision => Some(Self::Goal),
            Self::Goal => Some(Self::Task),
            Self::Task | Self::Todo => None,
        }
    }

    /// Name of the priority field (`importance` for todos, `urgency` otherwise).
    pub fn urgency_field(self) -> &'static str {
        match self {
            Self::Todo => "importance",
            _ => "urgency",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input or structure rejected before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankField {
        kind: EntityKind,
        field: &'static str,
    },
    /// Urgency/importance outside `1..=100`.
    UrgencyOutOfRange { field: &'static str, value: i64 },
    /// A kind that requires parents received none.
    MissingParent { kind: EntityKind },
    /// A referenced parent record does not exist.
    UnknownParent { kind: EntityKind, key: String },
    /// The same parent key was listed twice.
    DuplicateParent { kind: EntityKind, key: String },
    /// Wrong number of parent keys for a single-parent kind.
    ParentArity {
        kind: EntityKind,
        expected: usize,
        actual: usize,
    },
    /// Kind has no parent link to change.
    NoParentLink { kind: EntityKind },
    /// Task status label is not one of the known values.
    UnknownStatus(String),
    /// Two graph nodes share an id.
    DuplicateNode(String),
    /// Graph edge references a node that is not in the graph.
    DanglingEdge { source: String, target: String },
    /// Non-empty lineage graph without a decision node.
    MissingApex,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { kind, field } => {
                write!(f, "{kind} field `{field}` must not be blank")
            }
            Self::UrgencyOutOfRange { field, value } => write!(
                f,
                "{field} must be between {URGENCY_MIN} and {URGENCY_MAX}, got {value}"
            ),
            Self::MissingParent { kind } => write!(f, "{kind} requires at least one parent"),
            Self::UnknownParent { kind, key } => {
                write!(f, "referenced {kind} `{key}` does not exist")
            }
            Self::DuplicateParent { kind, key } => {
                write!(f, "{kind} lists parent `{key}` more than once")
            }
            Self::ParentArity {
                kind,
                expected,
                actual,
            } => write!(f, "{kind} takes {expected} parent(s), got {actual}"),
            Self::NoParentLink { kind } => write!(f, "{kind} has no parent link"),
            Self::UnknownStatus(value) => write!(f, "unknown task status `{value}`"),
            Self::DuplicateNode(id) => write!(f, "graph node `{id}` appears more than once"),
            Self::DanglingEdge { source, target } => {
                write!(f, "graph edge {source} -> {target} references a missing node")
            }
            Self::MissingApex => write!(f, "lineage graph has no decision node"),
        }
    }
}

impl Error for ValidationError {}

/// Validated urgency or importance score in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Urgency(u8);

impl Urgency {
    /// Midpoint score; packing radius equals the base radius at this value.
    pub const NEUTRAL: Urgency = Urgency(50);

    /// Validates an urgency value.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        Self::for_field("urgency", value)
    }

    /// Validates a score, naming `field` in the error.
    pub fn for_field(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if !(URGENCY_MIN..=URGENCY_MAX).contains(&value) {
            return Err(ValidationError::UrgencyOutOfRange { field, value });
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Urgency {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Urgency> for i64 {
    fn from(value: Urgency) -> Self {
        i64::from(value.0)
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task progress state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Display label, also the persisted form.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "Not Started" => Ok(Self::NotStarted),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Record addressable by a unique key within its kind.
pub trait Keyed {
    const KIND: EntityKind;

    fn key(&self) -> &str;
    fn set_key(&mut self, key: String);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concern {
    pub concern: String,
    pub urgency: Urgency,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub related_concern: String,
    pub urgency: Urgency,
    pub created_at: i64,
}

/// Decision citing one or more questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: String,
    pub rationale: String,
    /// Ordered, duplicate-free, never empty.
    pub related_questions: Vec<String>,
    pub urgency: Urgency,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub goal: String,
    pub related_decision: String,
    pub urgency: Urgency,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub assignee: String,
    pub related_goal: String,
    pub status: TaskStatus,
    pub urgency: Urgency,
    pub created_at: i64,
}

/// Standalone todo item outside the lineage graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    pub details: String,
    /// Ordered set: trimmed, non-blank, first occurrence kept.
    pub categories: Vec<String>,
    pub importance: Urgency,
    pub created_at: i64,
}

impl Keyed for Concern {
    const KIND: EntityKind = EntityKind::Concern;

    fn key(&self) -> &str {
        &self.concern
    }

    fn set_key(&mut self, key: String) {
        self.concern = key;
    }
}

impl Keyed for Question {
    const KIND: EntityKind = EntityKind::Question;

    fn key(&self) -> &str {
        &self.question
    }

    fn set_key(&mut self, key: String) {
        self.question = key;
    }
}

impl Keyed for Decision {
    const KIND: EntityKind = EntityKind::Decision;

    fn key(&self) -> &str {
        &self.decision
    }

    fn set_key(&mut self, key: String) {
        self.decision = key;
    }
}

impl Keyed for Goal {
    const KIND: EntityKind = EntityKind::Goal;

    fn key(&self) -> &str {
        &self.goal
    }

    fn set_key(&mut self, key: String) {
        self.goal = key;
    }
}

impl Keyed for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn key(&self) -> &str {
        &self.task
    }

    fn set_key(&mut self, key: String) {
        self.task = key;
    }
}

impl Keyed for Todo {
    const KIND: EntityKind = EntityKind::Todo;

    fn key(&self) -> &str {
        &self.title
    }

    fn set_key(&mut self, key: String) {
        self.title = key;
    }
}

/// Tagged view over the six record kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Concern(Concern),
    Question(Question),
    Decision(Decision),
    Goal(Goal),
    Task(Task),
    Todo(Todo),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Concern(_) => EntityKind::Concern,
            Self::Question(_) => EntityKind::Question,
            Self::Decision(_) => EntityKind::Decision,
            Self::Goal(_) => EntityKind::Goal,
            Self::Task(_) => EntityKind::Task,
            Self::Todo(_) => EntityKind::Todo,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Concern(record) => record.key(),
            Self::Question(record) => record.key(),
            Self::Decision(record) => record.key(),
            Self::Goal(record) => record.key(),
            Self::Task(record) => record.key(),
            Self::Todo(record) => record.key(),
        }
    }

    /// Urgency, or importance for todos.
    pub fn urgency(&self) -> Urgency {
        match self {
            Self::Concern(record) => record.urgency,
            Self::Question(record) => record.urgency,
            Self::Decision(record) => record.urgency,
            Self::Goal(record) => record.urgency,
            Self::Task(record) => record.urgency,
            Self::Todo(record) => record.importance,
        }
    }

    /// Parent keys in declaration order; empty for concerns and todos.
    pub fn parent_keys(&self) -> Vec<String> {
        match self {
            Self::Question(record) => vec![record.related_concern.clone()],
            Self::Decision(record) => record.related_questions.clone(),
            Self::Goal(record) => vec![record.related_decision.clone()],
            Self::Task(record) => vec![record.related_goal.clone()],
            Self::Concern(_) | Self::Todo(_) => Vec::new(),
        }
    }
}

/// Rejects text that is empty after trim.
pub fn require_text(
    kind: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { kind, field });
    }
    Ok(())
}

/// Normalizes todo categories into an ordered set.
pub fn normalize_categories<I, S>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for category in categories {
        let category = category.into();
        let trimmed = category.trim();
        if trimmed.is_empty() || normalized.iter().any(|existing| existing == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}
