// ==========================================
// Terra em Dia - supply domain model
// ==========================================
// The supply quantity is the running balance of its movement log.
// After registration it changes only through movements: SupplyPatch has
// no quantity field.
// ==========================================

use crate::domain::types::{MovementKind, SupplyStatus, SupplyUnit};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type SupplyId = i64;
pub type MovementEventId = i64;

// ==========================================
// Supply
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub id: SupplyId,
    pub name: String,
    pub unit: SupplyUnit,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Supply {
    /// current / minimum, or `None` when no minimum is configured.
    pub fn fill_ratio(&self) -> Option<f64> {
        if self.minimum_quantity > 0.0 {
            Some(self.current_quantity / self.minimum_quantity)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplyRecord {
    pub name: String,
    pub unit: SupplyUnit,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyPatch {
    pub name: Option<String>,
    pub unit: Option<SupplyUnit>,
    pub minimum_quantity: Option<f64>,
}

impl SupplyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit.is_none() && self.minimum_quantity.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
}

impl NewMovement {
    pub fn inbound(amount: f64) -> Self {
        Self {
            kind: MovementKind::Inbound,
            amount,
            note: String::new(),
        }
    }

    pub fn outbound(amount: f64) -> Self {
        Self {
            kind: MovementKind::Outbound,
            amount,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Event row plus the balance it produces, written as one unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementAppend {
    pub supply_id: SupplyId,
    pub kind: MovementKind,
    pub amount: f64,
    pub note: String,
    pub resulting_quantity: f64,
}

// ==========================================
// MovementEvent
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementEvent {
    pub id: MovementEventId,
    pub supply_id: SupplyId,
    pub kind: MovementKind,
    pub amount: f64,
    pub note: String,
    pub recorded_at: NaiveDateTime,
}

// ==========================================
// Read models
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyView {
    #[serde(flatten)]
    pub supply: Supply,
    pub status: SupplyStatus,
}

/// Totals over one supply's movement log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementTotals {
    pub supply_id: SupplyId,
    pub movement_count: usize,
    pub inbound_total: f64,
    pub outbound_total: f64,
}

impl MovementTotals {
    pub fn from_events(supply_id: SupplyId, events: &[MovementEvent]) -> Self {
        events.iter().fold(
            MovementTotals {
                supply_id,
                ..Default::default()
            },
            |mut acc, e| {
                acc.movement_count += 1;
                match e.kind {
                    MovementKind::Inbound => acc.inbound_total += e.amount,
                    MovementKind::Outbound => acc.outbound_total += e.amount,
                }
                acc
            },
        )
    }

    pub fn net(&self) -> f64 {
        self.inbound_total - self.outbound_total
    }
}
