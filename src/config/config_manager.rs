// ==========================================
// Terra em Dia - config manager
// ==========================================
// Loads and stores tunables in the config_kv table (scope 'global').
// Missing keys fall back to defaults; stored values are validated on
// load so a bad row surfaces as an error instead of a silent default.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::warning_window::WarningWindow;
use crate::db::{format_timestamp, now_utc, open_sqlite_connection};
use crate::engine::status_classifier::StatusClassifier;
use crate::repository::error::RepositoryError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection. PRAGMAs are re-applied (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Storage(RepositoryError::LockError(e.to_string())))
    }

    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn upsert(conn: &Connection, key: &str, value: &str, updated_at: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, updated_at],
        )
    }

    /// Reads the warning window; defaults to 10% of the interval when unset.
    pub fn load_warning_window(&self) -> ConfigResult<WarningWindow> {
        let mode = self.get_global_config_value(config_keys::WARNING_WINDOW_MODE)?;
        let value = self.get_global_config_value(config_keys::WARNING_WINDOW_VALUE)?;

        let (mode, value) = match (mode, value) {
            (None, None) => return Ok(WarningWindow::default()),
            (Some(mode), Some(value)) => (mode, value),
            (Some(mode), None) => {
                // mode without a value: use the mode's natural default
                let window = match mode.trim().to_ascii_uppercase().as_str() {
                    "FRACTION" => WarningWindow::default(),
                    "HOURS" => WarningWindow::AbsoluteHours(0.0),
                    other => return Err(ConfigError::UnknownWarningMode(other.to_string())),
                };
                return Ok(window);
            }
            (None, Some(value)) => ("FRACTION".to_string(), value),
        };

        let parsed: f64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            key: config_keys::WARNING_WINDOW_VALUE.to_string(),
            value: value.clone(),
        })?;
        WarningWindow::from_parts(&mode, parsed)
    }

    /// Validates and persists both keys in one transaction.
    pub fn set_warning_window(&self, window: &WarningWindow) -> ConfigResult<()> {
        window.validate()?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = format_timestamp(&now_utc());
        Self::upsert(&tx, config_keys::WARNING_WINDOW_MODE, window.mode_str(), &now)?;
        Self::upsert(
            &tx,
            config_keys::WARNING_WINDOW_VALUE,
            &window.raw_value().to_string(),
            &now,
        )?;
        tx.commit()?;

        info!(mode = window.mode_str(), value = window.raw_value(), "warning window updated");
        Ok(())
    }

    /// Classifier built from the persisted warning window.
    pub fn classifier(&self) -> ConfigResult<StatusClassifier> {
        let window = self.load_warning_window()?;
        debug!(%window, "classifier loaded from config");
        Ok(StatusClassifier::new(window))
    }

    /// All global keys as a JSON object string.
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let map = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;
        serde_json::to_string(&map)
            .map_err(|e| ConfigError::Storage(RepositoryError::InternalError(e.to_string())))
    }
}

pub mod config_keys {
    pub const WARNING_WINDOW_MODE: &str = "machine.warning_window.mode";
    pub const WARNING_WINDOW_VALUE: &str = "machine.warning_window.value";
}
