//! Workbook files: SQLite databases with one table per sheet.
//!
//! # Responsibility
//! - Open workbooks read-write for export and read-only for import.
//! - Bring a workbook's sheets up to the latest layout before export.
//!
//! # Invariants
//! - The sheet layout version lives in `PRAGMA user_version`.
//! - Import never creates a file and never runs DDL.
//! - A workbook written by a newer build is neither read nor overwritten.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_workbook, open_workbook_read_only};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Import target does not exist.
    MissingWorkbook(PathBuf),
    /// Sheet layout is newer than any migration this build ships.
    UnsupportedSchemaVersion {
        workbook_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::MissingWorkbook(_) => "workbook_missing",
            Self::UnsupportedSchemaVersion { .. } => "workbook_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "workbook storage error: {err}"),
            Self::MissingWorkbook(path) => {
                write!(f, "workbook `{}` does not exist", path.display())
            }
            Self::UnsupportedSchemaVersion {
                workbook_version,
                latest_supported,
            } => write!(
                f,
                "workbook sheet layout v{workbook_version} was written by a newer build; \
                 this build reads up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingWorkbook(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
