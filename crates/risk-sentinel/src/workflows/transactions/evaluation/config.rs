use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds and weights applied by the risk rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRules {
    /// Amounts strictly above this are treated as high value.
    pub high_value_threshold: Decimal,
    pub high_value_points: u32,
    /// Prior events at most this many minutes old count as recent.
    pub activity_window_minutes: i64,
    /// Recent-event count tolerated before blocking.
    pub max_recent_events: usize,
    pub activity_points: u32,
    /// A location change strictly inside this many minutes is suspicious.
    pub location_change_minutes: i64,
    pub location_change_points: u32,
    /// Score assigned outright when the location is denylisted.
    pub denylist_score: u32,
}

/// Rule settings that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("{field} must be zero or more minutes (found {minutes})")]
    NegativeWindow { field: &'static str, minutes: i64 },
    #[error("{field} of {minutes} minutes is out of range")]
    WindowOutOfRange { field: &'static str, minutes: i64 },
}

impl RiskRules {
    /// Reject windows that are negative or not representable as a `TimeDelta`.
    pub fn validate(&self) -> Result<(), RuleError> {
        check_window("activity_window_minutes", self.activity_window_minutes)?;
        check_window("location_change_minutes", self.location_change_minutes)?;
        Ok(())
    }

    pub fn activity_window(&self) -> TimeDelta {
        saturating_minutes(self.activity_window_minutes)
    }

    pub fn location_change_window(&self) -> TimeDelta {
        saturating_minutes(self.location_change_minutes)
    }
}

fn check_window(field: &'static str, minutes: i64) -> Result<(), RuleError> {
    if minutes < 0 {
        return Err(RuleError::NegativeWindow { field, minutes });
    }
    TimeDelta::try_minutes(minutes)
        .map(|_| ())
        .ok_or(RuleError::WindowOutOfRange { field, minutes })
}

// Unvalidated rules clamp to the representable range instead of panicking.
fn saturating_minutes(minutes: i64) -> TimeDelta {
    TimeDelta::try_minutes(minutes).unwrap_or(if minutes < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

impl Default for RiskRules {
    fn default() -> Self {
        Self {
            high_value_threshold: Decimal::from(10_000),
            high_value_points: 50,
            activity_window_minutes: 60,
            max_recent_events: 10,
            activity_points: 30,
            location_change_minutes: 30,
            location_change_points: 20,
            denylist_score: 100,
        }
    }
}
