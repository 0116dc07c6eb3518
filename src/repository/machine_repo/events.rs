use super::core::{find_machine, machine_not_found, MachineRepository};
use crate::db::{format_timestamp, next_event_timestamp, parse_timestamp};
use crate::domain::machine::{Machine, MachineId, MaintenanceAppend, MaintenanceEvent};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::timestamp;
use crate::repository::store::MaintenanceEventStore;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_COLUMNS: &str = r#"
    id, machine_id, description, reading_at_event, cost, note, recorded_at
"#;

fn map_event_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceEvent> {
    Ok(MaintenanceEvent {
        id: row.get(0)?,
        machine_id: row.get(1)?,
        description: row.get(2)?,
        reading_at_event: row.get(3)?,
        cost: row.get(4)?,
        note: row.get(5)?,
        recorded_at: timestamp(row, 6)?,
    })
}

fn find_event(conn: &Connection, id: i64) -> RepositoryResult<Option<MaintenanceEvent>> {
    let sql = format!("SELECT {} FROM maintenance_event WHERE id = ?1", EVENT_COLUMNS);
    Ok(conn.query_row(&sql, params![id], map_event_row).optional()?)
}

impl MaintenanceEventStore for MachineRepository {
    fn list_by_machine(&self, machine_id: MachineId) -> RepositoryResult<Vec<MaintenanceEvent>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_event WHERE machine_id = ?1 ORDER BY recorded_at ASC, id ASC",
            EVENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![machine_id], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    fn append(&self, append: &MaintenanceAppend) -> RepositoryResult<(Machine, MaintenanceEvent)> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        if find_machine(&tx, append.machine_id)?.is_none() {
            return Err(machine_not_found(append.machine_id));
        }

        let last_raw: Option<String> = tx.query_row(
            "SELECT MAX(recorded_at) FROM maintenance_event WHERE machine_id = ?1",
            params![append.machine_id],
            |row| row.get(0),
        )?;
        let last = last_raw.as_deref().and_then(parse_timestamp);
        let recorded_at = format_timestamp(&next_event_timestamp(last));

        tx.execute(
            r#"
            INSERT INTO maintenance_event (
                machine_id, description, reading_at_event, cost, note, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                append.machine_id,
                append.description,
                append.reading_at_event,
                append.cost,
                append.note,
                recorded_at,
            ],
        )?;
        let event_id = tx.last_insert_rowid();

        tx.execute(
            r#"
            UPDATE machine SET
                current_reading = ?2,
                last_service_reading = ?2,
                next_service_threshold = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
            params![
                append.machine_id,
                append.reading_at_event,
                append.next_service_threshold,
                recorded_at,
            ],
        )?;

        let machine =
            find_machine(&tx, append.machine_id)?.ok_or_else(|| machine_not_found(append.machine_id))?;
        let event = find_event(&tx, event_id)?.ok_or_else(|| {
            RepositoryError::DatabaseTransactionError(format!(
                "maintenance_event id={} vanished inside its own transaction",
                event_id
            ))
        })?;

        tx.commit()?;
        Ok((machine, event))
    }
}
