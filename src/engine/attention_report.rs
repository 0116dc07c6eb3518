// ==========================================
// Terra em Dia - attention report
// ==========================================
// Read-only aggregation over the tracker and the ledger: what needs a
// look today. Nothing here writes.
// ==========================================

use crate::db::now_utc;
use crate::domain::machine::MachineView;
use crate::domain::supply::SupplyView;
use crate::domain::types::{MachineStatus, SupplyStatus};
use crate::engine::error::EngineResult;
use crate::engine::inventory_ledger::InventoryLedger;
use crate::engine::maintenance_tracker::MaintenanceTracker;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MachineCounts {
    pub ok: usize,
    pub upcoming: usize,
    pub attention: usize,
}

impl MachineCounts {
    pub fn total(&self) -> usize {
        self.ok + self.upcoming + self.attention
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SupplyCounts {
    pub ok: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttentionReport {
    /// Machines not OK: Atenção first, then by hours left.
    pub machines: Vec<MachineView>,
    /// Low supplies, emptiest first.
    pub supplies: Vec<SupplyView>,
    pub machine_counts: MachineCounts,
    pub supply_counts: SupplyCounts,
    pub generated_at: NaiveDateTime,
}

impl AttentionReport {
    pub fn is_all_clear(&self) -> bool {
        self.machines.is_empty() && self.supplies.is_empty()
    }
}

pub struct AttentionReporter;

impl AttentionReporter {
    #[instrument(skip_all)]
    pub fn build(
        tracker: &MaintenanceTracker,
        ledger: &InventoryLedger,
    ) -> EngineResult<AttentionReport> {
        Ok(Self::from_views(tracker.list_machines()?, ledger.list_supplies()?))
    }

    pub fn from_views(machines: Vec<MachineView>, supplies: Vec<SupplyView>) -> AttentionReport {
        let mut machine_counts = MachineCounts::default();
        for m in &machines {
            match m.status {
                MachineStatus::Ok => machine_counts.ok += 1,
                MachineStatus::Upcoming => machine_counts.upcoming += 1,
                MachineStatus::Attention => machine_counts.attention += 1,
            }
        }
        let mut supply_counts = SupplyCounts::default();
        for s in &supplies {
            match s.status {
                SupplyStatus::Ok => supply_counts.ok += 1,
                SupplyStatus::Low => supply_counts.low += 1,
            }
        }

        let mut machines: Vec<MachineView> = machines
            .into_iter()
            .filter(|m| m.status.needs_attention())
            .collect();
        // Attention sorts above Upcoming
        machines.sort_by(|a, b| {
            b.status
                .cmp(&a.status)
                .then_with(|| a.hours_until_service.total_cmp(&b.hours_until_service))
                .then_with(|| a.machine.id.cmp(&b.machine.id))
        });

        let mut supplies: Vec<SupplyView> =
            supplies.into_iter().filter(|s| s.status.is_low()).collect();
        supplies.sort_by(|a, b| {
            fill_ratio(a)
                .total_cmp(&fill_ratio(b))
                .then_with(|| a.supply.id.cmp(&b.supply.id))
        });

        debug!(
            machines = machines.len(),
            supplies = supplies.len(),
            "attention report built"
        );

        AttentionReport {
            machines,
            supplies,
            machine_counts,
            supply_counts,
            generated_at: now_utc(),
        }
    }
}

// A low supply always has minimum > 0, so the ratio exists.
fn fill_ratio(view: &SupplyView) -> f64 {
    view.supply.fill_ratio().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::warning_window::WarningWindow;
    use crate::domain::machine::Machine;
    use crate::domain::supply::Supply;
    use crate::domain::types::{MachineType, SupplyUnit};
    use crate::engine::status_classifier::StatusClassifier;

    fn machine(id: i64, reading: f64, threshold: f64) -> Machine {
        Machine {
            id,
            name: format!("Máquina {}", id),
            machine_type: MachineType::Tractor,
            current_reading: reading,
            service_interval: 250.0,
            last_service_reading: threshold - 250.0,
            next_service_threshold: threshold,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    fn supply(id: i64, quantity: f64, minimum: f64) -> Supply {
        Supply {
            id,
            name: format!("Insumo {}", id),
            unit: SupplyUnit::Kilogram,
            current_quantity: quantity,
            minimum_quantity: minimum,
            created_at: now_utc(),
            updated_at: now_utc(),
        }
    }

    #[test]
    fn test_ordering_and_counts() {
        let c = StatusClassifier::new(WarningWindow::default());
        let machines = vec![
            machine(1, 100.0, 250.0), // OK
            machine(2, 240.0, 250.0), // Próximo, 10h left
            machine(3, 300.0, 250.0), // Atenção, -50h
            machine(4, 230.0, 250.0), // Próximo, 20h left
            machine(5, 250.0, 250.0), // Atenção, 0h
        ]
        .into_iter()
        .map(|m| c.machine_view(m))
        .collect();
        let supplies = vec![
            supply(1, 4.0, 5.0),   // 0.8
            supply(2, 10.0, 5.0),  // OK
            supply(3, 1.0, 10.0),  // 0.1
            supply(4, 0.0, 0.0),   // OK
        ]
        .into_iter()
        .map(|s| c.supply_view(s))
        .collect();

        let report = AttentionReporter::from_views(machines, supplies);

        let ids: Vec<i64> = report.machines.iter().map(|m| m.machine.id).collect();
        assert_eq!(ids, vec![3, 5, 2, 4]);
        let ids: Vec<i64> = report.supplies.iter().map(|s| s.supply.id).collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(
            report.machine_counts,
            MachineCounts { ok: 1, upcoming: 2, attention: 2 }
        );
        assert_eq!(report.machine_counts.total(), 5);
        assert_eq!(report.supply_counts, SupplyCounts { ok: 2, low: 2 });
        assert!(!report.is_all_clear());
    }

    #[test]
    fn test_empty_is_all_clear() {
        let report = AttentionReporter::from_views(Vec::new(), Vec::new());
        assert!(report.is_all_clear());
        assert_eq!(report.machine_counts.total(), 0);
    }
}
