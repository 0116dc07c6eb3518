// ==========================================
// Terra em Dia - machine repository (SQLite)
// ==========================================
// Tables: machine, maintenance_event
// Data mapping only, no business rules.
// ==========================================

mod core;
mod events;


pub use core::MachineRepository;
