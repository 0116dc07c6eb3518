// ==========================================
// Terra em Dia - machine domain model
// ==========================================
// A machine carries its hour-meter reading and the cached projection of
// its maintenance history (last service reading, next-service threshold).
// Status is never stored: see engine::status_classifier.
// ==========================================

use crate::domain::types::{MachineStatus, MachineType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type MachineId = i64;
pub type MaintenanceEventId = i64;

// ==========================================
// Machine
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub machine_type: MachineType,

    // ===== hour meter =====
    pub current_reading: f64,  // cumulative operating hours
    pub service_interval: f64, // hours between services

    // ===== projection of the maintenance log =====
    pub last_service_reading: f64,   // reading at last maintenance (or registration)
    pub next_service_threshold: f64, // last_service_reading + service_interval

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Machine {
    /// Operating hours left until the next service; negative when overdue.
    pub fn hours_until_service(&self) -> f64 {
        self.next_service_threshold - self.current_reading
    }
}

/// Threshold formula shared by registration, interval edits and
/// maintenance events.
pub fn next_service_threshold(last_service_reading: f64, service_interval: f64) -> f64 {
    last_service_reading + service_interval
}

// ==========================================
// Store-facing records
// ==========================================

/// Fully validated machine row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMachineRecord {
    pub name: String,
    pub machine_type: MachineType,
    pub current_reading: f64,
    pub service_interval: f64,
    pub last_service_reading: f64,
    pub next_service_threshold: f64,
}

/// Column-level patch applied by `MachineStore::update`.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineRecordPatch {
    pub name: Option<String>,
    pub machine_type: Option<MachineType>,
    pub current_reading: Option<f64>,
    pub service_interval: Option<f64>,
    pub next_service_threshold: Option<f64>,
}

impl MachineRecordPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.machine_type.is_none()
            && self.current_reading.is_none()
            && self.service_interval.is_none()
            && self.next_service_threshold.is_none()
    }
}

// ==========================================
// Caller-facing inputs
// ==========================================

/// Direct edit of a machine. The threshold is derived, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachinePatch {
    pub name: Option<String>,
    pub machine_type: Option<MachineType>,
    pub service_interval: Option<f64>,
    pub current_reading: Option<f64>,
}

/// A maintenance event as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaintenance {
    pub description: String,
    pub reading_at_event: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub note: String,
}

impl NewMaintenance {
    pub fn new(description: impl Into<String>, reading_at_event: f64) -> Self {
        Self {
            description: description.into(),
            reading_at_event,
            cost: 0.0,
            note: String::new(),
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// One unit of work for `MaintenanceEventStore::append`: the event row plus
/// the machine projection it produces. Both are written together or not at
/// all.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceAppend {
    pub machine_id: MachineId,
    pub description: String,
    pub reading_at_event: f64,
    pub cost: f64,
    pub note: String,
    pub next_service_threshold: f64,
}

// ==========================================
// MaintenanceEvent
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub id: MaintenanceEventId,
    pub machine_id: MachineId,
    pub description: String,
    pub reading_at_event: f64,
    pub cost: f64,
    pub note: String,
    pub recorded_at: NaiveDateTime, // assigned by the store, monotonic per machine
}

// ==========================================
// Read models
// ==========================================

/// Machine with its status derived at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineView {
    #[serde(flatten)]
    pub machine: Machine,
    pub status: MachineStatus,
    pub hours_until_service: f64,
}

/// Aggregate over one machine's maintenance log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSummary {
    pub machine_id: MachineId,
    pub event_count: usize,
    pub total_cost: f64,
    pub last_recorded_at: Option<NaiveDateTime>,
    pub last_service_reading: f64,
}

impl MaintenanceSummary {
    pub fn from_events(machine: &Machine, events: &[MaintenanceEvent]) -> Self {
        Self {
            machine_id: machine.id,
            event_count: events.len(),
            total_cost: events.iter().map(|e| e.cost).sum(),
            last_recorded_at: events.iter().map(|e| e.recorded_at).max(),
            last_service_reading: machine.last_service_reading,
        }
    }
}
