// ==========================================
// Terra em Dia - machine warning window
// ==========================================
// Distance to the next-service threshold inside which a machine is
// reported as "Próximo". Two forms are supported; the default is 10% of
// the maintenance interval.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_WARNING_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value")]
pub enum WarningWindow {
    /// W = fraction × interval, 0 ≤ fraction ≤ 1
    #[serde(rename = "FRACTION")]
    FractionOfInterval(f64),
    /// W = min(hours, interval), hours ≥ 0
    #[serde(rename = "HOURS")]
    AbsoluteHours(f64),
}

impl Default for WarningWindow {
    fn default() -> Self {
        WarningWindow::FractionOfInterval(DEFAULT_WARNING_FRACTION)
    }
}

impl WarningWindow {
    pub fn mode_str(&self) -> &'static str {
        match self {
            WarningWindow::FractionOfInterval(_) => "FRACTION",
            WarningWindow::AbsoluteHours(_) => "HOURS",
        }
    }

    pub fn raw_value(&self) -> f64 {
        match self {
            WarningWindow::FractionOfInterval(v) | WarningWindow::AbsoluteHours(v) => *v,
        }
    }

    /// Builds a window from its persisted (mode, value) pair and validates it.
    pub fn from_parts(mode: &str, value: f64) -> ConfigResult<Self> {
        let window = match mode.trim().to_ascii_uppercase().as_str() {
            "FRACTION" => WarningWindow::FractionOfInterval(value),
            "HOURS" => WarningWindow::AbsoluteHours(value),
            other => return Err(ConfigError::UnknownWarningMode(other.to_string())),
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let value = self.raw_value();
        let reason = if !value.is_finite() {
            Some("value must be finite")
        } else if value < 0.0 {
            Some("value must be non-negative")
        } else if matches!(self, WarningWindow::FractionOfInterval(f) if *f > 1.0) {
            Some("fraction must not exceed 1 (window larger than the interval)")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidWarningWindow {
                mode: self.mode_str().to_string(),
                value,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Window in hours for a machine with the given interval.
    /// Never larger than the interval.
    pub fn hours_for(&self, service_interval: f64) -> f64 {
        let interval = service_interval.max(0.0);
        match self {
            WarningWindow::FractionOfInterval(f) => f.clamp(0.0, 1.0) * interval,
            WarningWindow::AbsoluteHours(h) => h.max(0.0).min(interval),
        }
    }
}

impl fmt::Display for WarningWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningWindow::FractionOfInterval(v) => write!(f, "{}% of interval", v * 100.0),
            WarningWindow::AbsoluteHours(v) => write!(f, "{}h", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ten_percent() {
        let w = WarningWindow::default();
        assert_eq!(w, WarningWindow::FractionOfInterval(0.1));
        assert!((w.hours_for(250.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_hours_clamped_to_interval() {
        let w = WarningWindow::AbsoluteHours(20.0);
        assert_eq!(w.hours_for(500.0), 20.0);
        assert_eq!(w.hours_for(15.0), 15.0);
    }

    #[test]
    fn test_validation() {
        assert!(WarningWindow::FractionOfInterval(1.0).validate().is_ok());
        assert!(WarningWindow::FractionOfInterval(1.5).validate().is_err());
        assert!(WarningWindow::AbsoluteHours(-1.0).validate().is_err());
        assert!(WarningWindow::AbsoluteHours(f64::NAN).validate().is_err());
        assert!(WarningWindow::AbsoluteHours(0.0).validate().is_ok());
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            WarningWindow::from_parts("hours", 20.0).unwrap(),
            WarningWindow::AbsoluteHours(20.0)
        );
        assert!(matches!(
            WarningWindow::from_parts("DAYS", 3.0),
            Err(ConfigError::UnknownWarningMode(_))
        ));
        assert!(matches!(
            WarningWindow::from_parts("FRACTION", 2.0),
            Err(ConfigError::InvalidWarningWindow { .. })
        ));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(WarningWindow::AbsoluteHours(20.0)).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "HOURS", "value": 20.0}));
    }
}
