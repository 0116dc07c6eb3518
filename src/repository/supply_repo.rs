// ==========================================
// Terra em Dia - supply repository (SQLite)
// ==========================================
// Tables: supply, movement_event
// Data mapping only, no business rules.
// ==========================================

mod core;
mod movements;

#[cfg(test)]
mod tests;

pub use core::SupplyRepository;
