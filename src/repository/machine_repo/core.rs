use crate::db::{format_timestamp, now_utc, open_sqlite_connection};
use crate::domain::machine::{Machine, MachineId, MachineRecordPatch, NewMachineRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{text_enum, timestamp};
use crate::repository::store::MachineStore;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub(super) const MACHINE_COLUMNS: &str = r#"
    id, name, machine_type,
    current_reading, service_interval,
    last_service_reading, next_service_threshold,
    created_at, updated_at
"#;

// ==========================================
// MachineRepository
// ==========================================
pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    /// Opens its own connection to `db_path`.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

pub(super) fn map_machine_row(row: &Row<'_>) -> rusqlite::Result<Machine> {
    Ok(Machine {
        id: row.get(0)?,
        name: row.get(1)?,
        machine_type: text_enum(row, 2)?,
        current_reading: row.get(3)?,
        service_interval: row.get(4)?,
        last_service_reading: row.get(5)?,
        next_service_threshold: row.get(6)?,
        created_at: timestamp(row, 7)?,
        updated_at: timestamp(row, 8)?,
    })
}

pub(super) fn find_machine(conn: &Connection, id: MachineId) -> RepositoryResult<Option<Machine>> {
    let sql = format!("SELECT {} FROM machine WHERE id = ?1", MACHINE_COLUMNS);
    let machine = conn
        .query_row(&sql, params![id], map_machine_row)
        .optional()?;
    Ok(machine)
}

pub(super) fn machine_not_found(id: MachineId) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Machine".to_string(),
        id: id.to_string(),
    }
}

impl MachineStore for MachineRepository {
    fn get(&self, id: MachineId) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        find_machine(&conn, id)
    }

    fn list(&self) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM machine ORDER BY id ASC", MACHINE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let machines = stmt
            .query_map([], map_machine_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(machines)
    }

    fn create(&self, record: &NewMachineRecord) -> RepositoryResult<Machine> {
        let conn = self.get_conn()?;
        let now = format_timestamp(&now_utc());

        conn.execute(
            r#"
            INSERT INTO machine (
                name, machine_type,
                current_reading, service_interval,
                last_service_reading, next_service_threshold,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
            params![
                record.name,
                record.machine_type.to_db_str(),
                record.current_reading,
                record.service_interval,
                record.last_service_reading,
                record.next_service_threshold,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        find_machine(&conn, id)?.ok_or_else(|| machine_not_found(id))
    }

    fn update(&self, id: MachineId, patch: &MachineRecordPatch) -> RepositoryResult<Machine> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let current = find_machine(&tx, id)?.ok_or_else(|| machine_not_found(id))?;
        if patch.is_empty() {
            return Ok(current);
        }

        tx.execute(
            r#"
            UPDATE machine SET
                name = ?2,
                machine_type = ?3,
                current_reading = ?4,
                service_interval = ?5,
                next_service_threshold = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                patch.name.as_deref().unwrap_or(&current.name),
                patch
                    .machine_type
                    .unwrap_or(current.machine_type)
                    .to_db_str(),
                patch.current_reading.unwrap_or(current.current_reading),
                patch.service_interval.unwrap_or(current.service_interval),
                patch
                    .next_service_threshold
                    .unwrap_or(current.next_service_threshold),
                format_timestamp(&now_utc()),
            ],
        )?;

        let updated = find_machine(&tx, id)?.ok_or_else(|| machine_not_found(id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&self, id: MachineId) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let events = tx.execute(
            "DELETE FROM maintenance_event WHERE machine_id = ?1",
            params![id],
        )?;
        let machines = tx.execute("DELETE FROM machine WHERE id = ?1", params![id])?;

        tx.commit()?;
        tracing::debug!(machine_id = id, events, "machine rows deleted");
        Ok(machines > 0)
    }
}
