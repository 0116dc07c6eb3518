// ==========================================
// Terra em Dia - configuration layer
// ==========================================
// Storage: config_kv table
// ==========================================

pub mod config_manager;
pub mod error;
pub mod warning_window;

pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use warning_window::{WarningWindow, DEFAULT_WARNING_FRACTION};
