// ==========================================
// Terra em Dia - repository layer
// ==========================================
// Store contracts consumed by the engine plus their SQLite
// implementation. Repositories contain no business logic.
// All queries are parameterised.
// ==========================================

pub mod error;
pub mod machine_repo;
pub mod row_utils;
pub mod store;
pub mod supply_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use machine_repo::MachineRepository;
pub use store::{MachineStore, MaintenanceEventStore, MovementEventStore, SupplyStore};
pub use supply_repo::SupplyRepository;
