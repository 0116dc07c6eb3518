// ==========================================
// Terra em Dia - SQLite connection setup
// ==========================================
// Every connection gets the same PRAGMAs: foreign keys are per
// connection in SQLite and so is busy_timeout.
// ==========================================

use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version the code expects (see scripts/dev_db/schema.sql)
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Storage format of every timestamp column. Sorts lexicographically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const SCHEMA_SQL: &str = include_str!("../scripts/dev_db/schema.sql");

pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, used by unit tests and demos.
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Creates missing tables and indexes. Safe to run on every start.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    if let Some(found) = read_schema_version(conn)? {
        if found != CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                found,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version mismatch, database may be from another release"
            );
        }
    }
    Ok(())
}

/// Reads schema_version, `None` if the table does not exist.
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

// ==========================================
// Timestamp helpers
// ==========================================

pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Timestamp for a new event of a parent whose latest event was recorded
/// at `last`: never earlier than `last`.
pub fn next_event_timestamp(last: Option<NaiveDateTime>) -> NaiveDateTime {
    let now = now_utc();
    match last {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}
