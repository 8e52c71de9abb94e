//! Workbook connection bootstrap.
//!
//! # Invariants
//! - Read-write connections have migrations fully applied.
//! - Read-only connections never run DDL; they only check the version.

use super::migrations::{apply_migrations, current_user_version, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (creating if needed) a workbook file and applies pending migrations.
///
/// # Side effects
/// - Emits `workbook_open` events with duration and status.
pub fn open_workbook(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=workbook_open module=db status=start mode=read_write");

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });
    log_open("read_write", started_at, result)
}

/// Opens an existing workbook without write access.
///
/// # Errors
/// - `MissingWorkbook` when no file exists at `path`.
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
pub fn open_workbook_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();
    info!("event=workbook_open module=db status=start mode=read_only");

    if !path.is_file() {
        return log_open(
            "read_only",
            started_at,
            Err(DbError::MissingWorkbook(path.to_path_buf())),
        );
    }
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let result = Connection::open_with_flags(path, flags)
        .map_err(DbError::from)
        .and_then(|conn| {
            let workbook_version = current_user_version(&conn)?;
            let latest_supported = latest_version();
            if workbook_version > latest_supported {
                return Err(DbError::UnsupportedSchemaVersion {
                    workbook_version,
                    latest_supported,
                });
            }
            Ok(conn)
        });
    log_open("read_only", started_at, result)
}

fn log_open(
    mode: &str,
    started_at: Instant,
    result: DbResult<Connection>,
) -> DbResult<Connection> {
    match &result {
        Ok(_) => info!(
            "event=workbook_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=workbook_open module=db status=error mode={} duration_ms={} error_code={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code()
        ),
    }
    result
}
