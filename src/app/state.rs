// ==========================================
// Terra em Dia - application state
// ==========================================
// Wires one shared SQLite connection into the repositories, the config
// manager and the two engines.
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::config::config_manager::ConfigManager;
use crate::config::error::ConfigResult;
use crate::config::warning_window::WarningWindow;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::engine::attention_report::{AttentionReport, AttentionReporter};
use crate::engine::error::EngineResult;
use crate::engine::inventory_ledger::InventoryLedger;
use crate::engine::maintenance_tracker::MaintenanceTracker;
use crate::engine::status_classifier::StatusClassifier;
use crate::repository::{MachineRepository, SupplyRepository};

pub const DB_PATH_ENV: &str = "TERRA_EM_DIA_DB_PATH";
const DB_FILE_NAME: &str = "terra_em_dia.db";

pub struct AppState {
    pub db_path: String,
    pub config_manager: Arc<ConfigManager>,
    pub tracker: Arc<MaintenanceTracker>,
    pub ledger: Arc<InventoryLedger>,
}

impl AppState {
    /// Opens (or creates) the database at `db_path` and builds every service
    /// on one shared connection.
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initialising AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database {}: {}", db_path, e))?;
        Self::from_connection(db_path, conn)
    }

    pub fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        configure_sqlite_connection(&conn)
            .map_err(|e| format!("cannot configure connection: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("cannot initialise schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("cannot create ConfigManager: {}", e))?,
        );
        let classifier = config_manager
            .classifier()
            .map_err(|e| format!("invalid stored configuration: {}", e))?;

        let machine_repo = Arc::new(MachineRepository::from_connection(conn.clone()));
        let supply_repo = Arc::new(SupplyRepository::from_connection(conn));

        let tracker = Arc::new(MaintenanceTracker::new(
            machine_repo.clone(),
            machine_repo,
            classifier,
        ));
        let ledger = Arc::new(InventoryLedger::new(
            supply_repo.clone(),
            supply_repo,
            classifier,
        ));

        tracing::info!(window = %classifier.warning_window(), "AppState ready");
        Ok(Self {
            db_path,
            config_manager,
            tracker,
            ledger,
        })
    }

    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// Persists a new warning window and reclassifies everything from the
    /// next read on.
    pub fn set_warning_window(&self, window: WarningWindow) -> ConfigResult<()> {
        self.config_manager.set_warning_window(&window)?;
        let classifier = StatusClassifier::new(window);
        self.tracker.set_classifier(classifier);
        self.ledger.set_classifier(classifier);
        Ok(())
    }

    pub fn attention_report(&self) -> EngineResult<AttentionReport> {
        AttentionReporter::build(&self.tracker, &self.ledger)
    }
}

/// `TERRA_EM_DIA_DB_PATH` if set, else the user data directory, else the
/// working directory.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("terra-em-dia-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("terra-em-dia");

        // a missing directory falls back to the working directory
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{MachineStatus, MachineType};

    fn state() -> AppState {
        let conn = crate::db::open_in_memory().unwrap();
        AppState::from_connection(":memory:".to_string(), conn).unwrap()
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }

    #[test]
    fn test_window_change_reclassifies_and_persists() {
        let app = state();
        let view = app
            .tracker
            .register_machine("Trator John Deere", MachineType::Tractor, 250.0, 0.0)
            .unwrap();
        app.tracker
            .update_machine(
                view.machine.id,
                crate::domain::machine::MachinePatch {
                    current_reading: Some(230.0),
                    ..Default::default()
                },
            )
            .unwrap();
        // 20h left, default window 25h
        assert_eq!(
            app.tracker.get_machine(view.machine.id).unwrap().status,
            MachineStatus::Upcoming
        );

        app.set_warning_window(WarningWindow::AbsoluteHours(10.0)).unwrap();
        assert_eq!(
            app.tracker.get_machine(view.machine.id).unwrap().status,
            MachineStatus::Ok
        );
        assert_eq!(
            app.config_manager.load_warning_window().unwrap(),
            WarningWindow::AbsoluteHours(10.0)
        );
    }
}
