// ==========================================
// Storage failure propagation tests
// ==========================================
// Stores that fail on purpose: the engine must surface the store error
// unchanged, without retrying and without partial writes.
// ==========================================

mod test_helpers;

#[cfg(test)]
mod storage_error_test {
    use crate::test_helpers::{create_test_db, create_test_repos};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use terra_em_dia::domain::types::{MachineType, SupplyUnit};
    use terra_em_dia::domain::{
        Machine, MachineId, MaintenanceAppend, MaintenanceEvent, MovementAppend, MovementEvent,
        NewMaintenance, NewMovement, Supply, SupplyId,
    };
    use terra_em_dia::engine::{
        EngineError, EngineErrorKind, InventoryLedger, MaintenanceTracker, StatusClassifier,
    };
    use terra_em_dia::repository::{
        MachineStore, MaintenanceEventStore, MovementEventStore, RepositoryError,
        RepositoryResult, SupplyStore,
    };

    const DISK_FULL: &str = "database or disk is full";

    /// Event store whose every call fails and counts attempts.
    #[derive(Default)]
    struct FailingEventStore {
        calls: AtomicUsize,
    }

    impl FailingEventStore {
        fn fail<T>(&self) -> RepositoryResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RepositoryError::DatabaseQueryError(DISK_FULL.to_string()))
        }
    }

    impl MaintenanceEventStore for FailingEventStore {
        fn list_by_machine(&self, _machine_id: MachineId) -> RepositoryResult<Vec<MaintenanceEvent>> {
            self.fail()
        }

        fn append(&self, _append: &MaintenanceAppend) -> RepositoryResult<(Machine, MaintenanceEvent)> {
            self.fail()
        }
    }

    impl MovementEventStore for FailingEventStore {
        fn list_by_supply(&self, _supply_id: SupplyId) -> RepositoryResult<Vec<MovementEvent>> {
            self.fail()
        }

        fn append(&self, _append: &MovementAppend) -> RepositoryResult<(Supply, MovementEvent)> {
            self.fail()
        }
    }

    fn assert_disk_full(err: EngineError) {
        assert_eq!(err.kind(), EngineErrorKind::Storage);
        match err {
            EngineError::Storage(RepositoryError::DatabaseQueryError(msg)) => {
                assert_eq!(msg, DISK_FULL)
            }
            other => panic!("store error was rewrapped: {:?}", other),
        }
    }

    #[test]
    fn test_failed_maintenance_append_propagates_unchanged() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let (machines, _) = create_test_repos(&db_path);
        let events = Arc::new(FailingEventStore::default());
        let tracker = MaintenanceTracker::new(
            machines.clone(),
            events.clone(),
            StatusClassifier::default(),
        );

        let id = tracker
            .register_machine("Trator MF 4290", MachineType::Tractor, 250.0, 0.0)
            .unwrap()
            .machine
            .id;

        let err = tracker
            .record_maintenance(id, NewMaintenance::new("Troca de óleo", 260.0))
            .unwrap_err();
        assert_disk_full(err);
        assert_eq!(events.calls.load(Ordering::SeqCst), 1, "engine must not retry");

        let machine = machines.get(id).unwrap().unwrap();
        assert_eq!(machine.current_reading, 0.0);
        assert_eq!(machine.next_service_threshold, 250.0);

        assert_disk_full(tracker.list_maintenance(id).unwrap_err());
    }

    #[test]
    fn test_failed_movement_append_propagates_unchanged() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let (_, supplies) = create_test_repos(&db_path);
        let events = Arc::new(FailingEventStore::default());
        let ledger = InventoryLedger::new(
            supplies.clone(),
            events.clone(),
            StatusClassifier::default(),
        );

        let id = ledger
            .register_supply("Óleo Diesel S10", SupplyUnit::Liter, 100.0, 10.0)
            .unwrap()
            .supply
            .id;

        assert_disk_full(ledger.record_movement(id, NewMovement::outbound(10.0)).unwrap_err());
        assert_eq!(events.calls.load(Ordering::SeqCst), 1);
        assert_eq!(supplies.get(id).unwrap().unwrap().current_quantity, 100.0);

        assert_disk_full(ledger.movement_totals(id).unwrap_err());
    }

    #[test]
    fn test_validation_fails_before_touching_the_store() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let (_, supplies) = create_test_repos(&db_path);
        let events = Arc::new(FailingEventStore::default());
        let ledger = InventoryLedger::new(supplies, events.clone(), StatusClassifier::default());

        let id = ledger
            .register_supply("Graxa Azul Lithium", SupplyUnit::Kilogram, 15.0, 10.0)
            .unwrap()
            .supply
            .id;

        let err = ledger.record_movement(id, NewMovement::inbound(-1.0)).unwrap_err();
        assert_eq!(err.kind(), EngineErrorKind::Validation);
        let err = ledger.record_movement(id, NewMovement::outbound(16.0)).unwrap_err();
        assert_eq!(err.kind(), EngineErrorKind::InsufficientStock);

        assert_eq!(events.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_machine_store_failure_on_read() {
        struct BrokenMachines;

        impl MachineStore for BrokenMachines {
            fn get(&self, _id: MachineId) -> RepositoryResult<Option<Machine>> {
                Err(RepositoryError::LockError("poisoned".to_string()))
            }
            fn list(&self) -> RepositoryResult<Vec<Machine>> {
                Err(RepositoryError::LockError("poisoned".to_string()))
            }
            fn create(
                &self,
                _record: &terra_em_dia::domain::NewMachineRecord,
            ) -> RepositoryResult<Machine> {
                Err(RepositoryError::LockError("poisoned".to_string()))
            }
            fn update(
                &self,
                _id: MachineId,
                _patch: &terra_em_dia::domain::MachineRecordPatch,
            ) -> RepositoryResult<Machine> {
                Err(RepositoryError::LockError("poisoned".to_string()))
            }
            fn delete(&self, _id: MachineId) -> RepositoryResult<bool> {
                Err(RepositoryError::LockError("poisoned".to_string()))
            }
        }

        let tracker = MaintenanceTracker::new(
            Arc::new(BrokenMachines),
            Arc::new(FailingEventStore::default()),
            StatusClassifier::default(),
        );

        for err in [
            tracker.list_machines().unwrap_err(),
            tracker.get_machine(1).unwrap_err(),
            tracker.delete_machine(1).unwrap_err(),
        ] {
            assert!(matches!(err, EngineError::Storage(RepositoryError::LockError(_))));
        }
    }
}
