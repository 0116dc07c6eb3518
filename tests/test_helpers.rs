// ==========================================
// Test helpers
// ==========================================
// Temp-file databases and ready-made services for integration tests.
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use terra_em_dia::app::AppState;
use terra_em_dia::db::{ensure_schema, open_sqlite_connection};
use terra_em_dia::domain::types::{MachineType, SupplyUnit};
use terra_em_dia::domain::{MachineView, SupplyView};
use terra_em_dia::repository::{MachineRepository, SupplyRepository};

/// Creates a temp database file with the full schema.
///
/// The `NamedTempFile` must stay alive for as long as the path is used.
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not valid UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// Full application state on a fresh temp database.
pub fn create_test_state() -> (NamedTempFile, AppState) {
    terra_em_dia::logging::init_test();
    let (temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    (temp_file, state)
}

/// Both SQLite repositories sharing one connection.
pub fn create_test_repos(
    db_path: &str,
) -> (Arc<MachineRepository>, Arc<SupplyRepository>) {
    let conn = Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()));
    (
        Arc::new(MachineRepository::from_connection(conn.clone())),
        Arc::new(SupplyRepository::from_connection(conn)),
    )
}

pub fn register_tractor(state: &AppState, interval: f64, reading: f64) -> MachineView {
    state
        .tracker
        .register_machine("Trator MF 4290", MachineType::Tractor, interval, reading)
        .unwrap()
}

pub fn register_fertilizer(state: &AppState, quantity: f64, minimum: f64) -> SupplyView {
    state
        .ledger
        .register_supply("Fertilizante NPK", SupplyUnit::Kilogram, quantity, minimum)
        .unwrap()
}
