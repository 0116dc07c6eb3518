// ==========================================
// Terra em Dia - maintenance status & inventory ledger
// ==========================================
// Layers:
// - domain:     entities, value types, status labels
// - repository: store traits + SQLite implementation
// - engine:     tracker, ledger, classifier, attention report
// - config:     warning window in config_kv
// - app:        shared state wiring
// ==========================================

pub mod app;

pub mod config;

pub mod db;

pub mod domain;

pub mod engine;

pub mod logging;

pub mod repository;

pub use domain::types::{MachineStatus, MachineType, MovementKind, SupplyStatus, SupplyUnit};

pub use domain::{
    Machine, MachinePatch, MachineView, MaintenanceEvent, MaintenanceSummary, MovementEvent,
    MovementTotals, NewMaintenance, NewMovement, Supply, SupplyPatch, SupplyView,
};

pub use engine::{
    AttentionReport, AttentionReporter, EngineError, EngineErrorKind, EngineResult,
    InventoryLedger, MaintenanceTracker, StatusClassifier,
};

pub use config::{ConfigError, ConfigManager, WarningWindow};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Terra em Dia";
