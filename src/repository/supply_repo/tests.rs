use super::SupplyRepository;
use crate::domain::supply::{MovementAppend, NewSupplyRecord, SupplyPatch};
use crate::domain::types::{MovementKind, SupplyUnit};
use crate::repository::error::RepositoryError;
use crate::repository::store::{MovementEventStore, SupplyStore};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_repo() -> (Arc<Mutex<Connection>>, SupplyRepository) {
    let conn = Arc::new(Mutex::new(crate::db::open_in_memory().unwrap()));
    let repo = SupplyRepository::from_connection(conn.clone());
    (conn, repo)
}

fn diesel(quantity: f64, minimum: f64) -> NewSupplyRecord {
    NewSupplyRecord {
        name: "Óleo Diesel S10".to_string(),
        unit: SupplyUnit::Liter,
        current_quantity: quantity,
        minimum_quantity: minimum,
    }
}

fn movement(supply_id: i64, kind: MovementKind, amount: f64, resulting: f64) -> MovementAppend {
    MovementAppend {
        supply_id,
        kind,
        amount,
        note: "Abastecimento".to_string(),
        resulting_quantity: resulting,
    }
}

#[test]
fn test_create_get_list() {
    let (_conn, repo) = setup_repo();
    let s = repo.create(&diesel(5000.0, 1000.0)).unwrap();

    assert_eq!(repo.get(s.id).unwrap(), Some(s.clone()));
    assert_eq!(repo.list().unwrap(), vec![s]);
}

#[test]
fn test_update_never_touches_quantity() {
    let (_conn, repo) = setup_repo();
    let s = repo.create(&diesel(20.0, 50.0)).unwrap();

    let patch = SupplyPatch {
        name: Some("Óleo 15W40".to_string()),
        unit: Some(SupplyUnit::Liter),
        minimum_quantity: Some(10.0),
    };
    let updated = repo.update(s.id, &patch).unwrap();

    assert_eq!(updated.name, "Óleo 15W40");
    assert_eq!(updated.minimum_quantity, 10.0);
    assert_eq!(updated.current_quantity, 20.0);
}

#[test]
fn test_update_missing_supply_is_not_found() {
    let (_conn, repo) = setup_repo();
    let err = repo.update(9, &SupplyPatch::default()).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_append_sets_quantity_and_lists_in_order() {
    let (_conn, repo) = setup_repo();
    let s = repo.create(&diesel(0.0, 0.0)).unwrap();

    repo.append(&movement(s.id, MovementKind::Inbound, 100.0, 100.0)).unwrap();
    let (supply, last) = repo
        .append(&movement(s.id, MovementKind::Outbound, 25.0, 75.0))
        .unwrap();

    assert_eq!(supply.current_quantity, 75.0);
    assert_eq!(last.kind, MovementKind::Outbound);

    let kinds: Vec<MovementKind> = repo
        .list_by_supply(s.id)
        .unwrap()
        .into_iter()
        .map(|m| m.kind)
        .collect();
    assert_eq!(kinds, vec![MovementKind::Inbound, MovementKind::Outbound]);
}

#[test]
fn test_schema_rejects_negative_balance() {
    let (conn, repo) = setup_repo();
    let s = repo.create(&diesel(5.0, 0.0)).unwrap();

    let result = repo.append(&movement(s.id, MovementKind::Outbound, 10.0, -5.0));
    assert!(result.is_err());

    // the failed append rolled back as a whole
    assert!(repo.list_by_supply(s.id).unwrap().is_empty());
    let qty: f64 = conn
        .lock()
        .unwrap()
        .query_row("SELECT current_quantity FROM supply WHERE id = ?1", [s.id], |row| row.get(0))
        .unwrap();
    assert_eq!(qty, 5.0);
}

#[test]
fn test_delete_cascades_movements() {
    let (conn, repo) = setup_repo();
    let s = repo.create(&diesel(0.0, 0.0)).unwrap();
    repo.append(&movement(s.id, MovementKind::Inbound, 10.0, 10.0)).unwrap();

    assert!(repo.delete(s.id).unwrap());
    assert!(repo.get(s.id).unwrap().is_none());

    let count: i64 = conn
        .lock()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM movement_event", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
