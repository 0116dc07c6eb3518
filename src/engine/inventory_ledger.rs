// ==========================================
// Terra em Dia - inventory ledger
// ==========================================
// Supplies and their movement history. The quantity only changes through
// movements: final = initial + Σ inbound − Σ outbound, never negative.
// ==========================================

use crate::domain::supply::{
    MovementAppend, MovementEvent, MovementTotals, NewMovement, NewSupplyRecord, Supply, SupplyId,
    SupplyPatch, SupplyView,
};
use crate::domain::types::{MovementKind, SupplyUnit};
use crate::engine::entity_lock::EntityLocks;
use crate::engine::error::{
    require_finite_result, require_name, require_non_negative, require_positive, EngineError,
    EngineResult,
};
use crate::engine::status_classifier::StatusClassifier;
use crate::repository::store::{MovementEventStore, SupplyStore};
use std::sync::{Arc, RwLock};
use tracing::{info, instrument, warn};

const ENTITY: &str = "supply";
const EVENT_ENTITY: &str = "movement_event";

pub struct InventoryLedger {
    supplies: Arc<dyn SupplyStore>,
    movements: Arc<dyn MovementEventStore>,
    classifier: RwLock<StatusClassifier>,
    locks: EntityLocks,
}

impl InventoryLedger {
    pub fn new(
        supplies: Arc<dyn SupplyStore>,
        movements: Arc<dyn MovementEventStore>,
        classifier: StatusClassifier,
    ) -> Self {
        Self {
            supplies,
            movements,
            classifier: RwLock::new(classifier),
            locks: EntityLocks::new(),
        }
    }

    pub fn classifier(&self) -> StatusClassifier {
        *self.classifier.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_classifier(&self, classifier: StatusClassifier) {
        *self.classifier.write().unwrap_or_else(|e| e.into_inner()) = classifier;
    }

    fn view(&self, supply: Supply) -> SupplyView {
        self.classifier().supply_view(supply)
    }

    fn load(&self, id: SupplyId) -> EngineResult<Supply> {
        self.supplies
            .get(id)?
            .ok_or_else(|| EngineError::not_found(ENTITY, id))
    }

    #[instrument(skip(self, name), fields(name = %name))]
    pub fn register_supply(
        &self,
        name: &str,
        unit: SupplyUnit,
        initial_quantity: f64,
        minimum_quantity: f64,
    ) -> EngineResult<SupplyView> {
        let checked = require_name(ENTITY, "name", name)
            .and_then(|_| require_non_negative(ENTITY, "current_quantity", initial_quantity))
            .and_then(|_| require_non_negative(ENTITY, "minimum_quantity", minimum_quantity));
        if let Err(e) = checked {
            warn!(error = %e, "supply registration rejected");
            return Err(e);
        }

        let supply = self.supplies.create(&NewSupplyRecord {
            name: name.trim().to_string(),
            unit,
            current_quantity: initial_quantity,
            minimum_quantity,
        })?;

        info!(supply_id = supply.id, quantity = supply.current_quantity, "supply registered");
        Ok(self.view(supply))
    }

    /// Edits name, unit or minimum. The quantity is out of reach here.
    #[instrument(skip(self, patch))]
    pub fn update_supply(&self, id: SupplyId, patch: SupplyPatch) -> EngineResult<SupplyView> {
        self.locks.with_lock(id, || -> EngineResult<SupplyView> {
            let current = self.load(id)?;

            let checked = patch
                .name
                .as_deref()
                .map_or(Ok(()), |name| require_name(ENTITY, "name", name))
                .and_then(|_| {
                    patch.minimum_quantity.map_or(Ok(()), |minimum| {
                        require_non_negative(ENTITY, "minimum_quantity", minimum)
                    })
                });
            if let Err(e) = checked {
                warn!(supply_id = id, error = %e, "supply update rejected");
                return Err(e);
            }

            if patch.is_empty() {
                return Ok(self.view(current));
            }
            let patch = SupplyPatch {
                name: patch.name.map(|n| n.trim().to_string()),
                ..patch
            };
            let supply = self.supplies.update(id, &patch)?;
            info!(supply_id = id, minimum = supply.minimum_quantity, "supply updated");
            Ok(self.view(supply))
        })
    }

    #[instrument(skip(self))]
    pub fn delete_supply(&self, id: SupplyId) -> EngineResult<()> {
        self.locks.with_lock(id, || -> EngineResult<()> {
            if !self.supplies.delete(id)? {
                warn!(supply_id = id, "delete of unknown supply");
                return Err(EngineError::not_found(ENTITY, id));
            }
            info!(supply_id = id, "supply deleted");
            Ok(())
        })
    }

    pub fn get_supply(&self, id: SupplyId) -> EngineResult<SupplyView> {
        Ok(self.view(self.load(id)?))
    }

    #[instrument(skip(self))]
    pub fn list_supplies(&self) -> EngineResult<Vec<SupplyView>> {
        let classifier = self.classifier();
        Ok(self
            .supplies
            .list()?
            .into_iter()
            .map(|s| classifier.supply_view(s))
            .collect())
    }

    /// Appends one inbound or outbound movement and applies it to the
    /// balance. An outbound larger than the balance is refused whole.
    #[instrument(skip(self, movement), fields(kind = %movement.kind, amount = movement.amount))]
    pub fn record_movement(
        &self,
        supply_id: SupplyId,
        movement: NewMovement,
    ) -> EngineResult<(SupplyView, MovementEvent)> {
        if let Err(e) = require_positive(EVENT_ENTITY, "amount", movement.amount) {
            warn!(supply_id, error = %e, "movement rejected");
            return Err(e);
        }

        self.locks.with_lock(supply_id, || -> EngineResult<(SupplyView, MovementEvent)> {
            let supply = self.load(supply_id)?;
            let available = supply.current_quantity;

            if movement.kind == MovementKind::Outbound && movement.amount > available {
                let err = EngineError::InsufficientStock {
                    supply_id,
                    requested: movement.amount,
                    available,
                };
                warn!(supply_id, error = %err, "movement rejected");
                return Err(err);
            }

            let resulting_quantity = available + movement.kind.signed(movement.amount);
            if let Err(e) = require_finite_result(EVENT_ENTITY, "amount", resulting_quantity) {
                warn!(supply_id, error = %e, "movement rejected");
                return Err(e);
            }

            let append = MovementAppend {
                supply_id,
                kind: movement.kind,
                amount: movement.amount,
                note: movement.note,
                resulting_quantity,
            };
            let (supply, event) = self.movements.append(&append)?;

            info!(
                supply_id,
                event_id = event.id,
                quantity = supply.current_quantity,
                "movement recorded"
            );
            Ok((self.view(supply), event))
        })
    }

    /// Movements of one supply, oldest first.
    pub fn list_movements(&self, supply_id: SupplyId) -> EngineResult<Vec<MovementEvent>> {
        self.load(supply_id)?;
        Ok(self.movements.list_by_supply(supply_id)?)
    }

    pub fn movement_totals(&self, supply_id: SupplyId) -> EngineResult<MovementTotals> {
        self.load(supply_id)?;
        let events = self.movements.list_by_supply(supply_id)?;
        Ok(MovementTotals::from_events(supply_id, &events))
    }
}
