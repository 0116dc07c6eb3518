use super::core::{find_supply, supply_not_found, SupplyRepository};
use crate::db::{format_timestamp, next_event_timestamp, parse_timestamp};
use crate::domain::supply::{MovementAppend, MovementEvent, Supply, SupplyId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{text_enum, timestamp};
use crate::repository::store::MovementEventStore;
use rusqlite::{params, Connection, OptionalExtension, Row};

const MOVEMENT_COLUMNS: &str = "id, supply_id, kind, amount, note, recorded_at";

fn map_movement_row(row: &Row<'_>) -> rusqlite::Result<MovementEvent> {
    Ok(MovementEvent {
        id: row.get(0)?,
        supply_id: row.get(1)?,
        kind: text_enum(row, 2)?,
        amount: row.get(3)?,
        note: row.get(4)?,
        recorded_at: timestamp(row, 5)?,
    })
}

fn find_movement(conn: &Connection, id: i64) -> RepositoryResult<Option<MovementEvent>> {
    let sql = format!("SELECT {} FROM movement_event WHERE id = ?1", MOVEMENT_COLUMNS);
    Ok(conn.query_row(&sql, params![id], map_movement_row).optional()?)
}

impl MovementEventStore for SupplyRepository {
    fn list_by_supply(&self, supply_id: SupplyId) -> RepositoryResult<Vec<MovementEvent>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM movement_event WHERE supply_id = ?1 ORDER BY recorded_at ASC, id ASC",
            MOVEMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let movements = stmt
            .query_map(params![supply_id], map_movement_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(movements)
    }

    fn append(&self, append: &MovementAppend) -> RepositoryResult<(Supply, MovementEvent)> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        if find_supply(&tx, append.supply_id)?.is_none() {
            return Err(supply_not_found(append.supply_id));
        }

        let last_raw: Option<String> = tx.query_row(
            "SELECT MAX(recorded_at) FROM movement_event WHERE supply_id = ?1",
            params![append.supply_id],
            |row| row.get(0),
        )?;
        let last = last_raw.as_deref().and_then(parse_timestamp);
        let recorded_at = format_timestamp(&next_event_timestamp(last));

        tx.execute(
            r#"
            INSERT INTO movement_event (supply_id, kind, amount, note, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                append.supply_id,
                append.kind.to_db_str(),
                append.amount,
                append.note,
                recorded_at,
            ],
        )?;
        let movement_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE supply SET current_quantity = ?2, updated_at = ?3 WHERE id = ?1",
            params![append.supply_id, append.resulting_quantity, recorded_at],
        )?;

        let supply =
            find_supply(&tx, append.supply_id)?.ok_or_else(|| supply_not_found(append.supply_id))?;
        let movement = find_movement(&tx, movement_id)?.ok_or_else(|| {
            RepositoryError::DatabaseTransactionError(format!(
                "movement_event id={} vanished inside its own transaction",
                movement_id
            ))
        })?;

        tx.commit()?;
        Ok((supply, movement))
    }
}
