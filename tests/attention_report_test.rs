// ==========================================
// Attention report integration tests
// ==========================================

mod test_helpers;

#[cfg(test)]
mod attention_report_test {
    use crate::test_helpers::create_test_state;
    use terra_em_dia::domain::types::{MachineStatus, MachineType, SupplyUnit};
    use terra_em_dia::domain::{MachinePatch, NewMaintenance, NewMovement};

    #[test]
    fn test_empty_database_is_all_clear() {
        let (_tmp, state) = create_test_state();
        let report = state.attention_report().unwrap();
        assert!(report.is_all_clear());
        assert_eq!(report.machine_counts.total(), 0);
        assert_eq!(report.supply_counts.low, 0);
    }

    #[test]
    fn test_report_lists_what_needs_attention() {
        let (_tmp, state) = create_test_state();
        let tracker = &state.tracker;
        let ledger = &state.ledger;

        let ok = tracker
            .register_machine("Trator Valtra T250", MachineType::Tractor, 250.0, 0.0)
            .unwrap();
        let due = tracker
            .register_machine("Pulverizador Patriot", MachineType::Sprayer, 300.0, 0.0)
            .unwrap();
        let near = tracker
            .register_machine("Colheitadeira S700", MachineType::Harvester, 500.0, 0.0)
            .unwrap();
        tracker
            .update_machine(
                due.machine.id,
                MachinePatch {
                    current_reading: Some(320.0),
                    ..Default::default()
                },
            )
            .unwrap();
        tracker
            .update_machine(
                near.machine.id,
                MachinePatch {
                    current_reading: Some(480.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let diesel = ledger
            .register_supply("Diesel S10", SupplyUnit::Liter, 10000.0, 2000.0)
            .unwrap();
        let oil = ledger
            .register_supply("Óleo 15W40", SupplyUnit::Liter, 40.0, 100.0)
            .unwrap();
        let additive = ledger
            .register_supply("Aditivo Radiador", SupplyUnit::Liter, 5.0, 20.0)
            .unwrap();
        ledger
            .record_movement(diesel.supply.id, NewMovement::outbound(9000.0))
            .unwrap();

        let report = state.attention_report().unwrap();

        let machine_ids: Vec<i64> = report.machines.iter().map(|m| m.machine.id).collect();
        assert_eq!(machine_ids, vec![due.machine.id, near.machine.id]);
        assert_eq!(report.machines[0].status, MachineStatus::Attention);
        assert_eq!(report.machines[1].status, MachineStatus::Upcoming);
        assert!(!machine_ids.contains(&ok.machine.id));

        // 1000/2000 = 0.5, 40/100 = 0.4, 5/20 = 0.25
        let supply_ids: Vec<i64> = report.supplies.iter().map(|s| s.supply.id).collect();
        assert_eq!(
            supply_ids,
            vec![additive.supply.id, oil.supply.id, diesel.supply.id]
        );

        assert_eq!(report.machine_counts.ok, 1);
        assert_eq!(report.machine_counts.upcoming, 1);
        assert_eq!(report.machine_counts.attention, 1);
        assert_eq!(report.supply_counts.low, 3);
        assert_eq!(report.supply_counts.ok, 0);
        assert!(!report.is_all_clear());
    }

    #[test]
    fn test_maintenance_clears_machine_from_report() {
        let (_tmp, state) = create_test_state();
        let id = state
            .tracker
            .register_machine("Trator JD 6125J", MachineType::Tractor, 250.0, 1100.0)
            .unwrap()
            .machine
            .id;
        state
            .tracker
            .update_machine(
                id,
                MachinePatch {
                    current_reading: Some(1360.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(state.attention_report().unwrap().machines.len(), 1);

        state
            .tracker
            .record_maintenance(id, NewMaintenance::new("Revisão 250h", 1360.0))
            .unwrap();
        assert!(state.attention_report().unwrap().is_all_clear());
    }

    #[test]
    fn test_report_serializes_labels() {
        let (_tmp, state) = create_test_state();
        state
            .tracker
            .register_machine("Escavadeira CAT 320", MachineType::Excavator, 1000.0, 0.0)
            .and_then(|v| {
                state.tracker.update_machine(
                    v.machine.id,
                    MachinePatch {
                        current_reading: Some(1000.0),
                        ..Default::default()
                    },
                )
            })
            .unwrap();

        let json = serde_json::to_value(state.attention_report().unwrap()).unwrap();
        assert_eq!(json["machines"][0]["status"], "Atenção");
        assert_eq!(json["machines"][0]["name"], "Escavadeira CAT 320");
        assert_eq!(json["machine_counts"]["attention"], 1);
    }
}
