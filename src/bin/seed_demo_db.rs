// ==========================================
// Terra em Dia - demo database seeder
// ==========================================
// Backs up and resets the database, then seeds machines, maintenance
// history, supplies and movements through the engine so the seeded data
// obeys the same invariants as live data.
//
// Usage: seed_demo_db [DB_PATH]
// ==========================================

use chrono::Local;
use rusqlite::Connection;
use std::error::Error;
use std::fs;
use std::path::Path;

use terra_em_dia::app::{get_default_db_path, AppState};
use terra_em_dia::db::open_sqlite_connection;
use terra_em_dia::domain::{MachinePatch, NewMaintenance, NewMovement};
use terra_em_dia::domain::types::{MachineType, SupplyUnit};

struct DemoMachine {
    name: &'static str,
    machine_type: MachineType,
    interval: f64,
    reading: f64,
    next_service: f64,
    // (description, reading, cost), ascending and at or below the last service
    history: &'static [(&'static str, f64, f64)],
}

struct DemoSupply {
    name: &'static str,
    unit: SupplyUnit,
    stocked: f64,
    minimum: f64,
    consumed: &'static [f64],
}

const MACHINES: &[DemoMachine] = &[
    DemoMachine {
        name: "Trator MF 4290",
        machine_type: MachineType::Tractor,
        interval: 250.0,
        reading: 1500.0,
        next_service: 1550.0,
        history: &[
            ("Troca de Óleo 500h", 500.0, 1200.0),
            ("Revisão Geral 750h", 750.0, 2500.0),
            ("Troca de Filtros 1000h", 1000.0, 800.0),
            ("Troca de Óleo e Filtros", 1250.0, 850.0),
        ],
    },
    DemoMachine {
        name: "Colheitadeira S700",
        machine_type: MachineType::Harvester,
        interval: 500.0,
        reading: 2480.0,
        next_service: 2500.0,
        history: &[
            ("Preparação Safra", 400.0, 5200.0),
            ("Troca de navalhas", 600.0, 1500.0),
            ("Lubrificação completa", 800.0, 300.0),
            ("Revisão Barra de Corte", 2000.0, 4500.0),
        ],
    },
    DemoMachine {
        name: "Pulverizador John Deere 4730",
        machine_type: MachineType::Sprayer,
        interval: 300.0,
        reading: 2100.0,
        next_service: 2100.0,
        history: &[
            ("Limpeza de bicos", 1500.0, 450.0),
            ("Revisão bomba de pressão", 1800.0, 3100.0),
        ],
    },
    DemoMachine {
        name: "Trator Massey Ferguson 7722",
        machine_type: MachineType::Tractor,
        interval: 250.0,
        reading: 450.0,
        next_service: 500.0,
        history: &[],
    },
    DemoMachine {
        name: "Semeadora Momentum Stara",
        machine_type: MachineType::Planter,
        interval: 150.0,
        reading: 320.0,
        next_service: 450.0,
        history: &[],
    },
    DemoMachine {
        name: "Escavadeira CAT 320",
        machine_type: MachineType::Excavator,
        interval: 1000.0,
        reading: 5600.0,
        next_service: 6000.0,
        history: &[],
    },
    DemoMachine {
        name: "Caminhão VW Constellation",
        machine_type: MachineType::Truck,
        interval: 5000.0,
        reading: 15200.0,
        next_service: 15000.0,
        history: &[("Troca de Pneus Dianteiros", 10000.0, 4800.0)],
    },
];

const SUPPLIES: &[DemoSupply] = &[
    DemoSupply {
        name: "Óleo Diesel S10",
        unit: SupplyUnit::Liter,
        stocked: 5000.0,
        minimum: 1000.0,
        consumed: &[800.0, 650.0],
    },
    DemoSupply {
        name: "Óleo Lubrificante 15W40",
        unit: SupplyUnit::Liter,
        stocked: 60.0,
        minimum: 50.0,
        consumed: &[25.0, 15.0],
    },
    DemoSupply {
        name: "Filtro de Ar Primário",
        unit: SupplyUnit::Unit,
        stocked: 5.0,
        minimum: 2.0,
        consumed: &[],
    },
    DemoSupply {
        name: "Semente Milho Híbrido",
        unit: SupplyUnit::Bag,
        stocked: 80.0,
        minimum: 50.0,
        consumed: &[40.0, 25.0],
    },
    DemoSupply {
        name: "Graxa Azul Lithium",
        unit: SupplyUnit::Kilogram,
        stocked: 15.0,
        minimum: 10.0,
        consumed: &[],
    },
    DemoSupply {
        name: "Aditivo Radiador",
        unit: SupplyUnit::Liter,
        stocked: 5.0,
        minimum: 20.0,
        consumed: &[],
    },
];

fn main() -> Result<(), Box<dyn Error>> {
    terra_em_dia::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;
    seed_machines(&state)?;
    seed_supplies(&state)?;

    print_quick_counts(&open_sqlite_connection(&db_path)?)?;

    let report = state.attention_report()?;
    eprintln!(
        "Attention: {} machine(s), {} supply(ies)",
        report.machines.len(),
        report.supplies.len()
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_machines(state: &AppState) -> Result<(), Box<dyn Error>> {
    for demo in MACHINES {
        let last_service = demo.next_service - demo.interval;
        let first = demo.history.first().map_or(last_service, |h| h.1);

        let view = state
            .tracker
            .register_machine(demo.name, demo.machine_type, demo.interval, first.min(last_service))?;
        let id = view.machine.id;

        for (description, reading, cost) in demo.history {
            state.tracker.record_maintenance(
                id,
                NewMaintenance::new(*description, *reading)
                    .with_cost(*cost)
                    .with_note("Manutenção preventiva realizada conforme manual."),
            )?;
        }
        let last_recorded = demo.history.last().map_or(first, |h| h.1);
        if last_service > last_recorded {
            state.tracker.record_maintenance(
                id,
                NewMaintenance::new("Revisão programada", last_service),
            )?;
        }

        state.tracker.update_machine(
            id,
            MachinePatch {
                current_reading: Some(demo.reading),
                ..Default::default()
            },
        )?;
    }
    Ok(())
}

fn seed_supplies(state: &AppState) -> Result<(), Box<dyn Error>> {
    for demo in SUPPLIES {
        let view = state
            .ledger
            .register_supply(demo.name, demo.unit, 0.0, demo.minimum)?;
        let id = view.supply.id;

        state
            .ledger
            .record_movement(id, NewMovement::inbound(demo.stocked).with_note("Estoque inicial"))?;
        for amount in demo.consumed {
            state
                .ledger
                .record_movement(id, NewMovement::outbound(*amount).with_note("Consumo em campo"))?;
        }
    }
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tables = ["machine", "maintenance_event", "supply", "movement_event", "config_kv"];

    eprintln!("Row counts:");
    for t in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", t);
        let c: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        eprintln!("  {:<20} {}", t, c);
    }
    Ok(())
}
