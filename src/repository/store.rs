// ==========================================
// Terra em Dia - record store contracts
// ==========================================
// Persistence collaborator seen by the engine. Implementations own id
// generation, timestamps and durability; they hold no business rules.
// Each append writes the event and the parent projection in one unit of
// work.
// ==========================================

use crate::domain::machine::{
    Machine, MachineId, MachineRecordPatch, MaintenanceAppend, MaintenanceEvent, NewMachineRecord,
};
use crate::domain::supply::{
    MovementAppend, MovementEvent, NewSupplyRecord, Supply, SupplyId, SupplyPatch,
};
use crate::repository::error::RepositoryResult;

pub trait MachineStore: Send + Sync {
    fn get(&self, id: MachineId) -> RepositoryResult<Option<Machine>>;

    /// All machines ordered by id.
    fn list(&self) -> RepositoryResult<Vec<Machine>>;

    fn create(&self, record: &NewMachineRecord) -> RepositoryResult<Machine>;

    /// Applies `patch` and returns the stored row.
    /// Fails with `RepositoryError::NotFound` if the machine is absent.
    fn update(&self, id: MachineId, patch: &MachineRecordPatch) -> RepositoryResult<Machine>;

    /// Removes the machine and its maintenance events together.
    /// Returns `false` if nothing was deleted.
    fn delete(&self, id: MachineId) -> RepositoryResult<bool>;
}

pub trait MaintenanceEventStore: Send + Sync {
    /// Events of one machine ordered by `recorded_at`, then id.
    fn list_by_machine(&self, machine_id: MachineId) -> RepositoryResult<Vec<MaintenanceEvent>>;

    /// Inserts the event and advances the machine projection
    /// (reading, last service reading, threshold) atomically.
    fn append(&self, append: &MaintenanceAppend) -> RepositoryResult<(Machine, MaintenanceEvent)>;
}

pub trait SupplyStore: Send + Sync {
    fn get(&self, id: SupplyId) -> RepositoryResult<Option<Supply>>;

    fn list(&self) -> RepositoryResult<Vec<Supply>>;

    fn create(&self, record: &NewSupplyRecord) -> RepositoryResult<Supply>;

    /// Name, unit and minimum only; the quantity is owned by the movement log.
    fn update(&self, id: SupplyId, patch: &SupplyPatch) -> RepositoryResult<Supply>;

    fn delete(&self, id: SupplyId) -> RepositoryResult<bool>;
}

pub trait MovementEventStore: Send + Sync {
    fn list_by_supply(&self, supply_id: SupplyId) -> RepositoryResult<Vec<MovementEvent>>;

    /// Inserts the movement and sets the supply quantity to
    /// `append.resulting_quantity` atomically.
    fn append(&self, append: &MovementAppend) -> RepositoryResult<(Supply, MovementEvent)>;
}
