// ==========================================
// Terra em Dia - maintenance tracker
// ==========================================
// Machines, hour-meter readings and the append-only maintenance log.
// Every mutation validates against the stored state inside the lock of
// the machine, then hands the store one atomic unit of work.
// ==========================================

use crate::domain::machine::{
    next_service_threshold, Machine, MachineId, MachinePatch, MachineRecordPatch, MachineView,
    MaintenanceAppend, MaintenanceEvent, MaintenanceSummary, NewMachineRecord, NewMaintenance,
};
use crate::domain::types::MachineType;
use crate::engine::entity_lock::EntityLocks;
use crate::engine::error::{
    require_finite_result, require_name, require_non_negative, require_positive, EngineError,
    EngineResult,
};
use crate::engine::status_classifier::StatusClassifier;
use crate::repository::store::{MachineStore, MaintenanceEventStore};
use std::sync::{Arc, RwLock};
use tracing::{info, instrument, warn};

const ENTITY: &str = "machine";
const EVENT_ENTITY: &str = "maintenance_event";

pub struct MaintenanceTracker {
    machines: Arc<dyn MachineStore>,
    events: Arc<dyn MaintenanceEventStore>,
    classifier: RwLock<StatusClassifier>,
    locks: EntityLocks,
}

impl MaintenanceTracker {
    pub fn new(
        machines: Arc<dyn MachineStore>,
        events: Arc<dyn MaintenanceEventStore>,
        classifier: StatusClassifier,
    ) -> Self {
        Self {
            machines,
            events,
            classifier: RwLock::new(classifier),
            locks: EntityLocks::new(),
        }
    }

    pub fn classifier(&self) -> StatusClassifier {
        *self.classifier.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Swaps the classifier; the next read reclassifies every machine.
    pub fn set_classifier(&self, classifier: StatusClassifier) {
        *self.classifier.write().unwrap_or_else(|e| e.into_inner()) = classifier;
        info!(window = %classifier.warning_window(), "machine classifier replaced");
    }

    fn view(&self, machine: Machine) -> MachineView {
        self.classifier().machine_view(machine)
    }

    fn load(&self, id: MachineId) -> EngineResult<Machine> {
        self.machines
            .get(id)?
            .ok_or_else(|| EngineError::not_found(ENTITY, id))
    }

    // ==========================================
    // Machines
    // ==========================================

    #[instrument(skip(self, name), fields(name = %name))]
    pub fn register_machine(
        &self,
        name: &str,
        machine_type: MachineType,
        service_interval: f64,
        initial_reading: f64,
    ) -> EngineResult<MachineView> {
        let threshold = next_service_threshold(initial_reading, service_interval);
        let checked = require_name(ENTITY, "name", name)
            .and_then(|_| require_positive(ENTITY, "service_interval", service_interval))
            .and_then(|_| require_non_negative(ENTITY, "current_reading", initial_reading))
            .and_then(|_| require_finite_result(ENTITY, "service_interval", threshold));
        if let Err(e) = checked {
            warn!(error = %e, "machine registration rejected");
            return Err(e);
        }

        let record = NewMachineRecord {
            name: name.trim().to_string(),
            machine_type,
            current_reading: initial_reading,
            service_interval,
            last_service_reading: initial_reading,
            next_service_threshold: threshold,
        };
        let machine = self.machines.create(&record)?;

        info!(
            machine_id = machine.id,
            threshold = machine.next_service_threshold,
            "machine registered"
        );
        Ok(self.view(machine))
    }

    /// Edits name, type, interval or reading. A reading edit may only move
    /// forward; an interval edit recomputes the threshold from the last
    /// service reading.
    #[instrument(skip(self, patch))]
    pub fn update_machine(&self, id: MachineId, patch: MachinePatch) -> EngineResult<MachineView> {
        self.locks.with_lock(id, || -> EngineResult<MachineView> {
            let current = self.load(id)?;

            let checked = self.validate_patch(&current, &patch);
            if let Err(e) = checked {
                warn!(machine_id = id, error = %e, "machine update rejected");
                return Err(e);
            }

            let record_patch = MachineRecordPatch {
                name: patch.name.as_deref().map(|n| n.trim().to_string()),
                machine_type: patch.machine_type,
                current_reading: patch.current_reading,
                service_interval: patch.service_interval,
                next_service_threshold: patch
                    .service_interval
                    .map(|interval| next_service_threshold(current.last_service_reading, interval)),
            };
            if record_patch.is_empty() {
                return Ok(self.view(current));
            }

            let machine = self.machines.update(id, &record_patch)?;
            info!(
                machine_id = id,
                reading = machine.current_reading,
                threshold = machine.next_service_threshold,
                "machine updated"
            );
            Ok(self.view(machine))
        })
    }

    fn validate_patch(&self, current: &Machine, patch: &MachinePatch) -> EngineResult<()> {
        if let Some(name) = &patch.name {
            require_name(ENTITY, "name", name)?;
        }
        if let Some(interval) = patch.service_interval {
            require_positive(ENTITY, "service_interval", interval)?;
            require_finite_result(
                ENTITY,
                "service_interval",
                next_service_threshold(current.last_service_reading, interval),
            )?;
        }
        if let Some(reading) = patch.current_reading {
            require_non_negative(ENTITY, "current_reading", reading)?;
            if reading < current.current_reading {
                return Err(EngineError::InvariantViolation {
                    entity: ENTITY,
                    id: current.id,
                    field: "current_reading",
                    message: format!(
                        "cannot move backwards ({} < {})",
                        reading, current.current_reading
                    ),
                });
            }
        }
        Ok(())
    }

    /// Removes the machine and its whole maintenance log.
    #[instrument(skip(self))]
    pub fn delete_machine(&self, id: MachineId) -> EngineResult<()> {
        self.locks.with_lock(id, || -> EngineResult<()> {
            if !self.machines.delete(id)? {
                warn!(machine_id = id, "delete of unknown machine");
                return Err(EngineError::not_found(ENTITY, id));
            }
            info!(machine_id = id, "machine deleted");
            Ok(())
        })
    }

    pub fn get_machine(&self, id: MachineId) -> EngineResult<MachineView> {
        Ok(self.view(self.load(id)?))
    }

    #[instrument(skip(self))]
    pub fn list_machines(&self) -> EngineResult<Vec<MachineView>> {
        let classifier = self.classifier();
        Ok(self
            .machines
            .list()?
            .into_iter()
            .map(|m| classifier.machine_view(m))
            .collect())
    }

    // ==========================================
    // Maintenance log
    // ==========================================

    /// Appends a maintenance event at hour-meter R and moves the machine to
    /// reading R, last service R, threshold R + interval in the same unit of
    /// work.
    #[instrument(skip(self, maintenance), fields(reading = maintenance.reading_at_event))]
    pub fn record_maintenance(
        &self,
        machine_id: MachineId,
        maintenance: NewMaintenance,
    ) -> EngineResult<(MachineView, MaintenanceEvent)> {
        let checked = require_name(EVENT_ENTITY, "description", &maintenance.description)
            .and_then(|_| {
                require_non_negative(EVENT_ENTITY, "reading_at_event", maintenance.reading_at_event)
            })
            .and_then(|_| require_non_negative(EVENT_ENTITY, "cost", maintenance.cost));
        if let Err(e) = checked {
            warn!(machine_id, error = %e, "maintenance rejected");
            return Err(e);
        }

        self.locks.with_lock(machine_id, || -> EngineResult<(MachineView, MaintenanceEvent)> {
            let machine = self.load(machine_id)?;
            let reading = maintenance.reading_at_event;

            if reading < machine.current_reading {
                let err = EngineError::InvariantViolation {
                    entity: ENTITY,
                    id: machine_id,
                    field: "current_reading",
                    message: format!(
                        "maintenance reading {} is below the current reading {}",
                        reading, machine.current_reading
                    ),
                };
                warn!(machine_id, error = %err, "maintenance rejected");
                return Err(err);
            }

            let threshold = next_service_threshold(reading, machine.service_interval);
            if let Err(e) = require_finite_result(EVENT_ENTITY, "reading_at_event", threshold) {
                warn!(machine_id, error = %e, "maintenance rejected");
                return Err(e);
            }

            let append = MaintenanceAppend {
                machine_id,
                description: maintenance.description.trim().to_string(),
                reading_at_event: reading,
                cost: maintenance.cost,
                note: maintenance.note,
                next_service_threshold: threshold,
            };
            let (machine, event) = self.events.append(&append)?;

            info!(
                machine_id,
                event_id = event.id,
                threshold = machine.next_service_threshold,
                "maintenance recorded"
            );
            Ok((self.view(machine), event))
        })
    }

    /// Events of one machine, oldest first.
    pub fn list_maintenance(&self, machine_id: MachineId) -> EngineResult<Vec<MaintenanceEvent>> {
        self.load(machine_id)?;
        Ok(self.events.list_by_machine(machine_id)?)
    }

    pub fn maintenance_summary(&self, machine_id: MachineId) -> EngineResult<MaintenanceSummary> {
        let machine = self.load(machine_id)?;
        let events = self.events.list_by_machine(machine_id)?;
        Ok(MaintenanceSummary::from_events(&machine, &events))
    }
}
