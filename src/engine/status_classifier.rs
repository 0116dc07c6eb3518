// ==========================================
// Terra em Dia - status classifier
// ==========================================
// Status is a pure projection of stored quantities. It is recomputed on
// every read and never persisted, so changing the warning window
// reclassifies every machine without a migration.
// ==========================================

use crate::config::warning_window::WarningWindow;
use crate::domain::machine::{Machine, MachineView};
use crate::domain::supply::{Supply, SupplyView};
use crate::domain::types::{MachineStatus, SupplyStatus};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusClassifier {
    warning_window: WarningWindow,
}

impl StatusClassifier {
    pub fn new(warning_window: WarningWindow) -> Self {
        Self { warning_window }
    }

    pub fn warning_window(&self) -> WarningWindow {
        self.warning_window
    }

    /// Attention when the reading reached the threshold, Upcoming when the
    /// remaining hours fit inside the warning window.
    pub fn classify_machine(&self, reading: f64, threshold: f64, interval: f64) -> MachineStatus {
        if reading >= threshold {
            MachineStatus::Attention
        } else if threshold - reading <= self.warning_window.hours_for(interval) {
            MachineStatus::Upcoming
        } else {
            MachineStatus::Ok
        }
    }

    pub fn classify_supply(&self, quantity: f64, minimum: f64) -> SupplyStatus {
        if quantity < minimum {
            SupplyStatus::Low
        } else {
            SupplyStatus::Ok
        }
    }

    pub fn machine_view(&self, machine: Machine) -> MachineView {
        let status = self.classify_machine(
            machine.current_reading,
            machine.next_service_threshold,
            machine.service_interval,
        );
        let hours_until_service = machine.hours_until_service();
        MachineView {
            machine,
            status,
            hours_until_service,
        }
    }

    pub fn supply_view(&self, supply: Supply) -> SupplyView {
        let status = self.classify_supply(supply.current_quantity, supply.minimum_quantity);
        SupplyView { supply, status }
    }
}
