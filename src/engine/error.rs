// ==========================================
// Terra em Dia - engine errors
// ==========================================
// Every rejection is synchronous and happens before any mutation.
// Storage failures are wrapped unchanged; the engine never retries.
// ==========================================

use crate::repository::error::RepositoryError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable category code for mapping engine errors to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineErrorKind {
    Validation,
    InvariantViolation,
    NotFound,
    InsufficientStock,
    Storage,
}

impl EngineErrorKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::NotFound => "NOT_FOUND",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::Storage => "STORAGE",
        }
    }
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed input (blank name, non-positive interval, negative cost, ...).
    #[error("invalid {entity}.{field}: {message}")]
    Validation {
        entity: &'static str,
        field: &'static str,
        message: String,
    },

    /// Input is well-formed but contradicts stored state.
    #[error("{entity} id={id}: {field} {message}")]
    InvariantViolation {
        entity: &'static str,
        id: i64,
        field: &'static str,
        message: String,
    },

    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i64 },

    #[error("insufficient stock for supply id={supply_id}: requested {requested}, available {available}")]
    InsufficientStock {
        supply_id: i64,
        requested: f64,
        available: f64,
    },

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl EngineError {
    pub fn kind(&self) -> EngineErrorKind {
        match self {
            Self::Validation { .. } => EngineErrorKind::Validation,
            Self::InvariantViolation { .. } => EngineErrorKind::InvariantViolation,
            Self::NotFound { .. } => EngineErrorKind::NotFound,
            Self::InsufficientStock { .. } => EngineErrorKind::InsufficientStock,
            Self::Storage(_) => EngineErrorKind::Storage,
        }
    }

    pub(crate) fn validation(
        entity: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            entity,
            field,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

// ===== input checks shared by tracker and ledger =====

pub(crate) fn require_name(entity: &'static str, field: &'static str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(entity, field, "must not be blank"));
    }
    Ok(())
}

pub(crate) fn require_non_negative(entity: &'static str, field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::validation(entity, field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::validation(entity, field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

pub(crate) fn require_positive(entity: &'static str, field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::validation(entity, field, format!("must be finite, got {}", value)));
    }
    if value <= 0.0 {
        return Err(EngineError::validation(entity, field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

/// A sum of two valid inputs can still overflow to infinity.
pub(crate) fn require_finite_result(
    entity: &'static str,
    field: &'static str,
    value: f64,
) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::validation(entity, field, "result overflows"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        let err = EngineError::not_found("machine", 7);
        assert_eq!(err.kind(), EngineErrorKind::NotFound);
        assert_eq!(err.kind().to_string(), "NOT_FOUND");
        assert_eq!(err.to_string(), "machine not found (id=7)");

        let err = EngineError::from(RepositoryError::LockError("poisoned".into()));
        assert_eq!(err.kind().as_code(), "STORAGE");
    }

    #[test]
    fn test_checks() {
        assert!(require_name("machine", "name", "  ").is_err());
        assert!(require_name("machine", "name", "Trator 1").is_ok());
        assert!(require_positive("machine", "service_interval", 0.0).is_err());
        assert!(require_positive("machine", "service_interval", f64::INFINITY).is_err());
        assert!(require_non_negative("supply", "minimum_quantity", 0.0).is_ok());
        assert!(require_non_negative("supply", "minimum_quantity", -0.5).is_err());
        assert!(require_finite_result("movement_event", "amount", f64::MAX + f64::MAX).is_err());
        assert!(require_finite_result("movement_event", "amount", 12.5).is_ok());
    }
}
