// ==========================================
// Terra em Dia - command line entry
// ==========================================
// Prints the attention report (machines due for service, supplies
// below minimum) as JSON.
//
// Usage: terra-em-dia [DB_PATH]
// ==========================================

use anyhow::Context;
use terra_em_dia::app::{get_default_db_path, AppState};

fn main() -> anyhow::Result<()> {
    if std::env::var("TERRA_EM_DIA_LOG_JSON").is_ok() {
        terra_em_dia::logging::init_json();
    } else {
        terra_em_dia::logging::init();
    }

    tracing::info!("{} v{}", terra_em_dia::APP_NAME, terra_em_dia::VERSION);

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "using database");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;
    let report = state
        .attention_report()
        .context("failed to build attention report")?;

    if report.is_all_clear() {
        tracing::info!("nothing needs attention");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
