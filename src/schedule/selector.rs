//! Policy selection strategies.
//!
//! The builder asks a [`PolicySelector`] which exams to consider, which
//! interval applies to each, and from which date to count. The stage table
//! counts from the patient's latest sample; [`ResultDrivenRules`] counts from
//! each exam's own latest result and picks the interval from its value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::policy::{IntervalPolicy, IntervalTable};
use super::ScheduleError;
use crate::config::MAX_INTERVAL_DAYS;
use crate::models::enums::{CkdStage, Exam};
use crate::models::lab::{latest_result, LabResult};

// ─── Trait ────────────────────────────────────────────────────────────────────

/// Interval chosen for one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub policy: IntervalPolicy,
    /// Date to count from. `None` = the patient's reference date.
    pub base_date: Option<NaiveDate>,
}

/// One selection strategy per program. Self-contained, independently testable.
pub trait PolicySelector: Send + Sync {
    /// Exams considered, in presentation order.
    fn exams(&self) -> Vec<Exam>;

    /// Interval for `exam`, or `None` when the exam is not scheduled.
    fn select(&self, exam: Exam, stage: CkdStage, labs: &[LabResult]) -> Option<Selection>;

    /// Reason text attached to the agenda item.
    fn reason(&self, exam: Exam) -> String {
        format!("follow-up: {}", exam.label().to_lowercase())
    }
}

impl PolicySelector for IntervalTable {
    fn exams(&self) -> Vec<Exam> {
        self.catalogue().collect()
    }

    fn select(&self, exam: Exam, stage: CkdStage, _labs: &[LabResult]) -> Option<Selection> {
        self.policy(exam, stage).map(|policy| Selection {
            policy,
            base_date: None,
        })
    }
}

// ─── Result-driven rules ──────────────────────────────────────────────────────

/// Three-exam program where the interval depends on the latest value.
///
/// Exams without a result are not scheduled. Stage is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultDrivenRules {
    pub creatinine_days: u32,
    /// HbA1c (%) at or above this is out of target.
    pub hba1c_threshold: f64,
    pub hba1c_out_of_target_days: u32,
    pub hba1c_in_target_days: u32,
    /// LDL (mg/dL) at or above this is out of target.
    pub ldl_threshold: f64,
    pub ldl_out_of_target_days: u32,
    pub ldl_in_target_days: u32,
}

impl Default for ResultDrivenRules {
    fn default() -> Self {
        Self {
            creatinine_days: 90,
            hba1c_threshold: 7.0,
            hba1c_out_of_target_days: 90,
            hba1c_in_target_days: 180,
            ldl_threshold: 130.0,
            ldl_out_of_target_days: 90,
            ldl_in_target_days: 365,
        }
    }
}

impl ResultDrivenRules {
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let rules: Self = serde_json::from_str(json).map_err(|e| {
            ScheduleError::ConfigParse("result-driven rules".into(), e.to_string())
        })?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (exam, days) in [
            (Exam::SerumCreatinine, self.creatinine_days),
            (Exam::GlycatedHemoglobin, self.hba1c_out_of_target_days),
            (Exam::GlycatedHemoglobin, self.hba1c_in_target_days),
            (Exam::LdlCholesterol, self.ldl_out_of_target_days),
            (Exam::LdlCholesterol, self.ldl_in_target_days),
        ] {
            if days == 0 || days > MAX_INTERVAL_DAYS {
                return Err(ScheduleError::InvalidConfig(format!(
                    "interval for {} must be 1..={MAX_INTERVAL_DAYS} days (got {days})",
                    exam.as_str()
                )));
            }
        }
        Ok(())
    }

    fn interval_days(&self, exam: Exam, value: f64) -> Option<u32> {
        match exam {
            Exam::SerumCreatinine => Some(self.creatinine_days),
            Exam::GlycatedHemoglobin if value >= self.hba1c_threshold => {
                Some(self.hba1c_out_of_target_days)
            }
            Exam::GlycatedHemoglobin => Some(self.hba1c_in_target_days),
            Exam::LdlCholesterol if value >= self.ldl_threshold => Some(self.ldl_out_of_target_days),
            Exam::LdlCholesterol => Some(self.ldl_in_target_days),
            _ => None,
        }
    }
}

impl PolicySelector for ResultDrivenRules {
    fn exams(&self) -> Vec<Exam> {
        vec![
            Exam::SerumCreatinine,
            Exam::GlycatedHemoglobin,
            Exam::LdlCholesterol,
        ]
    }

    fn select(&self, exam: Exam, _stage: CkdStage, labs: &[LabResult]) -> Option<Selection> {
        let latest = latest_result(labs, exam)?;
        let days = self.interval_days(exam, latest.value)?;
        Some(Selection {
            policy: IntervalPolicy::fixed(days),
            base_date: Some(latest.sample_date),
        })
    }

    fn reason(&self, exam: Exam) -> String {
        match exam {
            Exam::SerumCreatinine => "renal function follow-up".into(),
            Exam::GlycatedHemoglobin => "glycemic control".into(),
            Exam::LdlCholesterol => "dyslipidemia follow-up".into(),
            other => format!("follow-up: {}", other.label().to_lowercase()),
        }
    }
}
