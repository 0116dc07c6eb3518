use crate::db::{format_timestamp, now_utc, open_sqlite_connection};
use crate::domain::supply::{NewSupplyRecord, Supply, SupplyId, SupplyPatch};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{text_enum, timestamp};
use crate::repository::store::SupplyStore;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SUPPLY_COLUMNS: &str = r#"
    id, name, unit, current_quantity, minimum_quantity, created_at, updated_at
"#;

// ==========================================
// SupplyRepository
// ==========================================
pub struct SupplyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplyRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn map_supply_row(row: &Row<'_>) -> rusqlite::Result<Supply> {
    Ok(Supply {
        id: row.get(0)?,
        name: row.get(1)?,
        unit: text_enum(row, 2)?,
        current_quantity: row.get(3)?,
        minimum_quantity: row.get(4)?,
        created_at: timestamp(row, 5)?,
        updated_at: timestamp(row, 6)?,
    })
}

pub(super) fn find_supply(conn: &Connection, id: SupplyId) -> RepositoryResult<Option<Supply>> {
    let sql = format!("SELECT {} FROM supply WHERE id = ?1", SUPPLY_COLUMNS);
    Ok(conn.query_row(&sql, params![id], map_supply_row).optional()?)
}

pub(super) fn supply_not_found(id: SupplyId) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Supply".to_string(),
        id: id.to_string(),
    }
}

impl SupplyStore for SupplyRepository {
    fn get(&self, id: SupplyId) -> RepositoryResult<Option<Supply>> {
        let conn = self.get_conn()?;
        find_supply(&conn, id)
    }

    fn list(&self) -> RepositoryResult<Vec<Supply>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM supply ORDER BY id ASC", SUPPLY_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let supplies = stmt
            .query_map([], map_supply_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(supplies)
    }

    fn create(&self, record: &NewSupplyRecord) -> RepositoryResult<Supply> {
        let conn = self.get_conn()?;
        let now = format_timestamp(&now_utc());

        conn.execute(
            r#"
            INSERT INTO supply (
                name, unit, current_quantity, minimum_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                record.name,
                record.unit.to_db_str(),
                record.current_quantity,
                record.minimum_quantity,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        find_supply(&conn, id)?.ok_or_else(|| supply_not_found(id))
    }

    fn update(&self, id: SupplyId, patch: &SupplyPatch) -> RepositoryResult<Supply> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let current = find_supply(&tx, id)?.ok_or_else(|| supply_not_found(id))?;
        if patch.is_empty() {
            return Ok(current);
        }

        // current_quantity is deliberately absent from this statement
        tx.execute(
            r#"
            UPDATE supply SET
                name = ?2,
                unit = ?3,
                minimum_quantity = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                id,
                patch.name.as_deref().unwrap_or(&current.name),
                patch.unit.unwrap_or(current.unit).to_db_str(),
                patch.minimum_quantity.unwrap_or(current.minimum_quantity),
                format_timestamp(&now_utc()),
            ],
        )?;

        let updated = find_supply(&tx, id)?.ok_or_else(|| supply_not_found(id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&self, id: SupplyId) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let movements = tx.execute(
            "DELETE FROM movement_event WHERE supply_id = ?1",
            params![id],
        )?;
        let supplies = tx.execute("DELETE FROM supply WHERE id = ?1", params![id])?;

        tx.commit()?;
        tracing::debug!(supply_id = id, movements, "supply rows deleted");
        Ok(supplies > 0)
    }
}
