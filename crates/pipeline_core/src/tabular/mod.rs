//! Tabular export/import of the entity store.
//!
//! # Responsibility
//! - Write the store to a workbook file, one sheet per entity kind.
//! - Read a workbook back into a fully validated store.
//!
//! # Invariants
//! - Export replaces every sheet in one transaction.
//! - Import yields a whole store or an error, never a partial one.

use crate::db::DbError;
use crate::model::entity::EntityKind;
use crate::service::pipeline_service::PipelineError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod workbook;

pub type TabularResult<T> = Result<T, TabularError>;

#[derive(Debug)]
pub enum TabularError {
    Db(DbError),
    /// A required sheet is absent from the workbook.
    MissingSheet(&'static str),
    /// A row failed validation; `row` is 1-based within its sheet.
    InvalidData {
        sheet: &'static str,
        row: usize,
        message: String,
    },
    /// Rows are individually valid but reference missing records.
    Integrity(PipelineError),
}

impl TabularError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(err) => err.code(),
            Self::MissingSheet(_) => "missing_sheet",
            Self::InvalidData { .. } => "invalid_data",
            Self::Integrity(_) => "integrity",
        }
    }
}

impl Display for TabularError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingSheet(sheet) => write!(f, "workbook has no `{sheet}` sheet"),
            Self::InvalidData {
                sheet,
                row,
                message,
            } => write!(f, "invalid row {row} in `{sheet}`: {message}"),
            Self::Integrity(err) => write!(f, "workbook integrity: {err}"),
        }
    }
}

impl Error for TabularError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Integrity(err) => Some(err),
            Self::MissingSheet(_) | Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for TabularError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for TabularError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sheet (table) name holding records of `kind`.
pub fn sheet_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Concern => "Concerns",
        EntityKind::Question => "Questions",
        EntityKind::Decision => "Decisions",
        EntityKind::Goal => "Goals",
        EntityKind::Task => "Tasks",
        EntityKind::Todo => "Todos",
    }
}
