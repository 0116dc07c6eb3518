use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid warning window ({mode}={value}): {reason}")]
    InvalidWarningWindow {
        mode: String,
        value: f64,
        reason: String,
    },

    #[error("unknown warning window mode: {0}")]
    UnknownWarningMode(String),

    #[error("config value is not a number (key={key}): {value}")]
    InvalidNumber { key: String, value: String },

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Storage(RepositoryError::from(err))
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
