use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleError;

/// Crate-level constants
pub const CRATE_NAME: &str = "nephro-agenda";
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tests scheduled within this many days of a visit's first test share its date.
pub const DEFAULT_UNIFICATION_WINDOW_DAYS: i64 = 14;

/// Clinical review happens this many days after a scheduled test. Fixed.
pub const REVIEW_OFFSET_DAYS: i64 = 7;

/// Longest accepted evaluate/reschedule interval (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "nephro_agenda=info"
}

/// Tunables for a scheduler instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub unification_window_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            unification_window_days: DEFAULT_UNIFICATION_WINDOW_DAYS,
        }
    }
}

impl SchedulerConfig {
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ScheduleError::ConfigParse("scheduler config".into(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.unification_window_days < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "unification_window_days must not be negative (got {})",
                self.unification_window_days
            )));
        }
        Ok(())
    }
}
