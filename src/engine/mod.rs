// ==========================================
// Terra em Dia - engine layer
// ==========================================
// Business rules only: validation, invariants, status projection.
// No SQL here; persistence goes through the store traits.
// ==========================================

pub mod attention_report;
pub mod entity_lock;
pub mod error;
pub mod inventory_ledger;
pub mod maintenance_tracker;
pub mod status_classifier;

pub use attention_report::{AttentionReport, AttentionReporter, MachineCounts, SupplyCounts};
pub use entity_lock::EntityLocks;
pub use error::{EngineError, EngineErrorKind, EngineResult};
pub use inventory_ledger::InventoryLedger;
pub use maintenance_tracker::MaintenanceTracker;
pub use status_classifier::StatusClassifier;
