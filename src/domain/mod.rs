// ==========================================
// Terra em Dia - domain layer
// ==========================================
// Entities, enumerations and read models.
// No data access and no classification logic here.
// ==========================================

pub mod machine;
pub mod supply;
pub mod types;

pub use machine::{
    Machine, MachineId, MachinePatch, MachineRecordPatch, MachineView, MaintenanceAppend,
    MaintenanceEvent, MaintenanceEventId, MaintenanceSummary, NewMachineRecord, NewMaintenance,
};
pub use supply::{
    MovementAppend, MovementEvent, MovementEventId, MovementTotals, NewMovement, NewSupplyRecord,
    Supply, SupplyId, SupplyPatch, SupplyView,
};
pub use types::{MachineStatus, MachineType, MovementKind, SupplyStatus, SupplyUnit, UnknownLabel};
