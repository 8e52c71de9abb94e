//! SQLite workbook reader/writer.
//!
//! Rows are written in store order and read back in rowid order. List
//! fields are stored as JSON array text.

use crate::db::{open_workbook, open_workbook_read_only};
use crate::model::entity::{
    normalize_categories, require_text, Concern, Decision, EntityKind, Goal, Question, Task,
    TaskStatus, Todo, Urgency,
};
use crate::repo::store::{EntityStore, StoreRows};
use crate::service::pipeline_service::PipelineService;
use crate::tabular::{sheet_name, TabularError, TabularResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Writes `store` to the workbook at `path`, replacing all sheet rows.
pub fn export_workbook(store: &EntityStore, path: impl AsRef<Path>) -> TabularResult<()> {
    let started_at = Instant::now();
    let result = open_workbook(path)
        .map_err(TabularError::from)
        .and_then(|mut conn| write_sheets(&mut conn, store));
    match &result {
        Ok(rows) => info!(
            "event=workbook_export module=tabular status=ok rows={} duration_ms={}",
            rows,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=workbook_export module=tabular status=error error_code={} duration_ms={}",
            err.code(),
            started_at.elapsed().as_millis()
        ),
    }
    result.map(|_| ())
}

/// Reads the workbook at `path` into a new store.
///
/// A workbook without a `Todos` sheet yields no todos.
///
/// # Errors
/// - `MissingSheet` when one of the lineage sheets is absent.
/// - `InvalidData` for blank keys, bad urgency, bad list text, unknown
///   status or duplicate keys.
pub fn import_workbook(path: impl AsRef<Path>) -> TabularResult<EntityStore> {
    let started_at = Instant::now();
    let result = open_workbook_read_only(path)
        .map_err(TabularError::from)
        .and_then(|conn| read_sheets(&conn));
    match &result {
        Ok(store) => info!(
            "event=workbook_import module=tabular status=ok concerns={} questions={} decisions={} goals={} tasks={} todos={} duration_ms={}",
            store.len(EntityKind::Concern),
            store.len(EntityKind::Question),
            store.len(EntityKind::Decision),
            store.len(EntityKind::Goal),
            store.len(EntityKind::Task),
            store.len(EntityKind::Todo),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=workbook_import module=tabular status=error error_code={} duration_ms={}",
            err.code(),
            started_at.elapsed().as_millis()
        ),
    }
    result
}

/// Imports a workbook and swaps it into `service`, all or nothing.
pub fn load_workbook(service: &mut PipelineService, path: impl AsRef<Path>) -> TabularResult<()> {
    let store = import_workbook(path)?;
    service
        .replace_store(store)
        .map_err(TabularError::Integrity)
}

fn write_sheets(conn: &mut Connection, store: &EntityStore) -> TabularResult<usize> {
    let tx = conn.transaction()?;
    for kind in EntityKind::ALL {
        tx.execute(&format!("DELETE FROM {};", sheet_name(kind)), [])?;
    }

    let mut rows = 0usize;
    {
        let mut insert = tx.prepare(
            "INSERT INTO Concerns (concern, urgency, date_added) VALUES (?1, ?2, ?3);",
        )?;
        for concern in store.concerns() {
            insert.execute(params![
                concern.concern,
                i64::from(concern.urgency),
                concern.created_at
            ])?;
            rows += 1;
        }

        let mut insert = tx.prepare(
            "INSERT INTO Questions (question, related_concern, urgency, date_added)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for question in store.questions() {
            insert.execute(params![
                question.question,
                question.related_concern,
                i64::from(question.urgency),
                question.created_at
            ])?;
            rows += 1;
        }

        let mut insert = tx.prepare(
            "INSERT INTO Decisions (decision, rationale, related_questions, urgency, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5);",
        )?;
        for decision in store.decisions() {
            insert.execute(params![
                decision.decision,
                decision.rationale,
                encode_list(&decision.related_questions),
                i64::from(decision.urgency),
                decision.created_at
            ])?;
            rows += 1;
        }

        let mut insert = tx.prepare(
            "INSERT INTO Goals (goal, related_decision, urgency, date_added)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for goal in store.goals() {
            insert.execute(params![
                goal.goal,
                goal.related_decision,
                i64::from(goal.urgency),
                goal.created_at
            ])?;
            rows += 1;
        }

        let mut insert = tx.prepare(
            "INSERT INTO Tasks (task, assignee, related_goal, status, urgency, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        )?;
        for task in store.tasks() {
            insert.execute(params![
                task.task,
                task.assignee,
                task.related_goal,
                task.status.label(),
                i64::from(task.urgency),
                task.created_at
            ])?;
            rows += 1;
        }

        let mut insert = tx.prepare(
            "INSERT INTO Todos (title, details, categories, importance, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5);",
        )?;
        for todo in store.todos() {
            insert.execute(params![
                todo.title,
                todo.details,
                encode_list(&todo.categories),
                i64::from(todo.importance),
                todo.created_at
            ])?;
            rows += 1;
        }
    }
    tx.commit()?;
    Ok(rows)
}

fn read_sheets(conn: &Connection) -> TabularResult<EntityStore> {
    for kind in [
        EntityKind::Concern,
        EntityKind::Question,
        EntityKind::Decision,
        EntityKind::Goal,
        EntityKind::Task,
    ] {
        if !table_exists(conn, sheet_name(kind))? {
            return Err(TabularError::MissingSheet(sheet_name(kind)));
        }
    }

    let concerns = read_sheet(
        conn,
        EntityKind::Concern,
        "SELECT concern, urgency, date_added FROM Concerns ORDER BY rowid;",
        |row| raw_row(row, 0),
        |raw, sheet| {
            Ok(Concern {
                urgency: sheet.urgency(raw.urgency, "urgency")?,
                concern: raw.key,
                created_at: raw.created_at,
            })
        },
    )?;

    let questions = read_sheet(
        conn,
        EntityKind::Question,
        "SELECT question, urgency, date_added, related_concern FROM Questions ORDER BY rowid;",
        |row| raw_row(row, 1),
        |mut raw, sheet| {
            let related_concern = raw.take_field();
            sheet.require(EntityKind::Question, "related_concern", &related_concern)?;
            Ok(Question {
                urgency: sheet.urgency(raw.urgency, "urgency")?,
                question: raw.key,
                related_concern,
                created_at: raw.created_at,
            })
        },
    )?;

    let decisions = read_sheet(
        conn,
        EntityKind::Decision,
        "SELECT decision, urgency, date_added, rationale, related_questions
         FROM Decisions ORDER BY rowid;",
        |row| raw_row(row, 2),
        |mut raw, sheet| {
            let rationale = raw.take_field();
            let related_questions = sheet.list(&raw.take_field(), "related_questions")?;
            sheet.require(EntityKind::Decision, "rationale", &rationale)?;
            if related_questions.is_empty() {
                return Err(sheet.invalid("related_questions must not be empty".to_string()));
            }
            Ok(Decision {
                urgency: sheet.urgency(raw.urgency, "urgency")?,
                decision: raw.key,
                rationale,
                related_questions,
                created_at: raw.created_at,
            })
        },
    )?;

    let goals = read_sheet(
        conn,
        EntityKind::Goal,
        "SELECT goal, urgency, date_added, related_decision FROM Goals ORDER BY rowid;",
        |row| raw_row(row, 1),
        |mut raw, sheet| {
            let related_decision = raw.take_field();
            sheet.require(EntityKind::Goal, "related_decision", &related_decision)?;
            Ok(Goal {
                urgency: sheet.urgency(raw.urgency, "urgency")?,
                goal: raw.key,
                related_decision,
                created_at: raw.created_at,
            })
        },
    )?;

    let tasks = read_sheet(
        conn,
        EntityKind::Task,
        "SELECT task, urgency, date_added, assignee, related_goal, status
         FROM Tasks ORDER BY rowid;",
        |row| raw_row(row, 3),
        |mut raw, sheet| {
            let assignee = raw.take_field();
            let related_goal = raw.take_field();
            let status = raw.take_field();
            sheet.require(EntityKind::Task, "assignee", &assignee)?;
            sheet.require(EntityKind::Task, "related_goal", &related_goal)?;
            let status =
                TaskStatus::parse(&status).map_err(|err| sheet.invalid(err.to_string()))?;
            Ok(Task {
                urgency: sheet.urgency(raw.urgency, "urgency")?,
                task: raw.key,
                assignee,
                related_goal,
                status,
                created_at: raw.created_at,
            })
        },
    )?;

    let todos = if table_exists(conn, sheet_name(EntityKind::Todo))? {
        read_sheet(
            conn,
            EntityKind::Todo,
            "SELECT title, importance, date_added, details, categories
             FROM Todos ORDER BY rowid;",
            |row| raw_row(row, 2),
            |mut raw, sheet| {
                let details = raw.take_field();
                let categories = sheet.list(&raw.take_field(), "categories")?;
                Ok(Todo {
                    importance: sheet.urgency(raw.urgency, "importance")?,
                    title: raw.key,
                    details,
                    categories: normalize_categories(categories),
                    created_at: raw.created_at,
                })
            },
        )?
    } else {
        Vec::new()
    };

    EntityStore::from_rows(StoreRows {
        concerns,
        questions,
        decisions,
        goals,
        tasks,
        todos,
    })
    .map_err(|err| TabularError::InvalidData {
        sheet: sheet_name(err.kind),
        row: 0,
        message: err.to_string(),
    })
}

/// Untyped sheet row: key, urgency, timestamp, then kind-specific text.
struct RawRow {
    key: String,
    urgency: i64,
    created_at: i64,
    fields: Vec<String>,
}

impl RawRow {
    fn take_field(&mut self) -> String {
        if self.fields.is_empty() {
            String::new()
        } else {
            self.fields.remove(0)
        }
    }
}

fn raw_row(row: &Row<'_>, extra: usize) -> rusqlite::Result<RawRow> {
    let mut fields = Vec::with_capacity(extra);
    for idx in 0..extra {
        let value: Option<String> = row.get(3 + idx)?;
        fields.push(value.unwrap_or_default());
    }
    Ok(RawRow {
        key: row.get(0)?,
        urgency: row.get(1)?,
        created_at: row.get(2)?,
        fields,
    })
}

/// Position of the row being validated, for error reporting.
struct SheetCursor {
    sheet: &'static str,
    row: usize,
}

impl SheetCursor {
    fn invalid(&self, message: String) -> TabularError {
        TabularError::InvalidData {
            sheet: self.sheet,
            row: self.row,
            message,
        }
    }

    fn require(&self, kind: EntityKind, field: &'static str, value: &str) -> TabularResult<()> {
        require_text(kind, field, value).map_err(|err| self.invalid(err.to_string()))
    }

    fn urgency(&self, value: i64, field: &'static str) -> TabularResult<Urgency> {
        Urgency::for_field(field, value).map_err(|err| self.invalid(err.to_string()))
    }

    fn list(&self, text: &str, field: &'static str) -> TabularResult<Vec<String>> {
        decode_list(text).map_err(|err| self.invalid(format!("{field}: {err}")))
    }
}

fn read_sheet<T>(
    conn: &Connection,
    kind: EntityKind,
    sql: &str,
    map_row: impl Fn(&Row<'_>) -> rusqlite::Result<RawRow>,
    build: impl Fn(RawRow, &SheetCursor) -> TabularResult<T>,
) -> TabularResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let raw_rows = stmt
        .query_map([], |row| map_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(raw_rows.len());
    let mut records = Vec::with_capacity(raw_rows.len());
    for (idx, raw) in raw_rows.into_iter().enumerate() {
        let cursor = SheetCursor {
            sheet: sheet_name(kind),
            row: idx + 1,
        };
        cursor.require(kind, kind.key_field(), &raw.key)?;
        if !seen.insert(raw.key.clone()) {
            return Err(cursor.invalid(format!("duplicate {} key", kind.key_field())));
        }
        records.push(build(raw, &cursor)?);
    }
    Ok(records)
}

fn table_exists(conn: &Connection, table: &str) -> TabularResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn decode_list(text: &str) -> Result<Vec<String>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::{decode_list, encode_list};

    #[test]
    fn list_text_keeps_order_and_quoting() {
        let items = vec!["b, \"quoted\"".to_string(), "a".to_string()];
        let text = encode_list(&items);
        assert_eq!(text, r#"["b, \"quoted\"","a"]"#);
        assert_eq!(decode_list(&text).unwrap(), items);
    }

    #[test]
    fn blank_list_text_is_empty() {
        assert!(decode_list("  ").unwrap().is_empty());
        assert!(decode_list("not json").is_err());
    }
}
