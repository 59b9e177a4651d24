//! Interval policy table: (exam, CKD stage) → renewal interval.
//!
//! The standard table ships compiled in; alternate tables can be loaded from
//! JSON. Row order is the exam presentation order.
//!
//! JSON shape (a bare number is a fixed cadence, a pair is
//! `[evaluate_days, reschedule_days]`, a missing stage is "not tracked"):
//!
//! ```json
//! [
//!   { "exam": "serum_creatinine", "stage1": 180, "stage3a": [90, 121] },
//!   { "exam": "parathyroid_hormone", "stage3a": 365, "stage4": 180 }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ScheduleError;
use crate::config::MAX_INTERVAL_DAYS;
use crate::models::enums::{CkdStage, Exam};

// ─── Types ────────────────────────────────────────────────────────────────────

/// Renewal rule for one exam at one stage.
///
/// A test is due once `evaluate_days` have passed since the base date; an
/// overdue test is rescheduled `reschedule_days` after today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub struct IntervalPolicy {
    pub evaluate_days: u32,
    pub reschedule_days: u32,
}

impl IntervalPolicy {
    pub const fn new(evaluate_days: u32, reschedule_days: u32) -> Self {
        Self {
            evaluate_days,
            reschedule_days,
        }
    }

    /// Same interval whether or not the test is overdue.
    pub const fn fixed(days: u32) -> Self {
        Self::new(days, days)
    }

    pub fn is_fixed(&self) -> bool {
        self.evaluate_days == self.reschedule_days
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Fixed(u32),
    Range(u32, u32),
}

impl From<PolicyRepr> for IntervalPolicy {
    fn from(repr: PolicyRepr) -> Self {
        match repr {
            PolicyRepr::Fixed(days) => Self::fixed(days),
            PolicyRepr::Range(evaluate, reschedule) => Self::new(evaluate, reschedule),
        }
    }
}

impl From<IntervalPolicy> for PolicyRepr {
    fn from(policy: IntervalPolicy) -> Self {
        if policy.is_fixed() {
            Self::Fixed(policy.evaluate_days)
        } else {
            Self::Range(policy.evaluate_days, policy.reschedule_days)
        }
    }
}

/// Policies for one exam across the tracked stages. `None` = not tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagePolicies {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage1: Option<IntervalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage2: Option<IntervalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage3a: Option<IntervalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage3b: Option<IntervalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage4: Option<IntervalPolicy>,
}

impl StagePolicies {
    pub fn get(&self, stage: CkdStage) -> Option<IntervalPolicy> {
        match stage {
            CkdStage::Stage1 => self.stage1,
            CkdStage::Stage2 => self.stage2,
            CkdStage::Stage3A => self.stage3a,
            CkdStage::Stage3B => self.stage3b,
            CkdStage::Stage4 => self.stage4,
        }
    }

    fn by_stage(policies: [Option<IntervalPolicy>; 5]) -> Self {
        let [stage1, stage2, stage3a, stage3b, stage4] = policies;
        Self {
            stage1,
            stage2,
            stage3a,
            stage3b,
            stage4,
        }
    }
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamIntervals {
    pub exam: Exam,
    #[serde(flatten)]
    pub stages: StagePolicies,
}

/// Immutable policy table. Construct with [`IntervalTable::standard`] or load
/// an alternate set; both are validated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExamIntervals>", into = "Vec<ExamIntervals>")]
pub struct IntervalTable {
    rows: Vec<ExamIntervals>,
}

// ─── Construction ─────────────────────────────────────────────────────────────

const fn every(days: u32) -> Option<IntervalPolicy> {
    Some(IntervalPolicy::fixed(days))
}

const fn range(evaluate_days: u32, reschedule_days: u32) -> Option<IntervalPolicy> {
    Some(IntervalPolicy::new(evaluate_days, reschedule_days))
}

fn row(exam: Exam, policies: [Option<IntervalPolicy>; 5]) -> ExamIntervals {
    ExamIntervals {
        exam,
        stages: StagePolicies::by_stage(policies),
    }
}

impl IntervalTable {
    /// Build a table from rows, rejecting duplicate exams, zero-day intervals
    /// and intervals longer than [`MAX_INTERVAL_DAYS`].
    pub fn new(rows: Vec<ExamIntervals>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::new();
        for r in &rows {
            if !seen.insert(r.exam) {
                return Err(ScheduleError::DuplicateExam(r.exam));
            }
            for stage in CkdStage::ALL {
                if let Some(policy) = r.stages.get(*stage) {
                    if policy.evaluate_days == 0 || policy.reschedule_days == 0 {
                        return Err(ScheduleError::ZeroInterval {
                            exam: r.exam,
                            stage: *stage,
                        });
                    }
                    let longest = policy.evaluate_days.max(policy.reschedule_days);
                    if longest > MAX_INTERVAL_DAYS {
                        return Err(ScheduleError::IntervalTooLong {
                            exam: r.exam,
                            stage: *stage,
                            days: longest,
                        });
                    }
                }
            }
        }
        Ok(Self { rows })
    }

    /// The stage-based follow-up table used in the CKD program.
    ///
    /// Columns: stage 1, 2, 3a, 3b, 4.
    #[rustfmt::skip]
    pub fn standard() -> Self {
        use Exam::*;
        Self {
            rows: vec![
                row(Urinalysis, [every(180), every(180), every(180), every(180), every(120)]),
                row(SerumCreatinine, [every(180), every(180), range(90, 121), range(90, 121), range(60, 93)]),
                row(FastingGlucose, [every(180), every(180), every(180), every(180), every(60)]),
                row(TotalCholesterol, [every(180), every(180), every(180), every(180), every(120)]),
                row(LdlCholesterol, [every(180), every(180), every(180), every(180), every(180)]),
                row(Triglycerides, [every(180), every(180), every(180), every(180), every(120)]),
                row(GlycatedHemoglobin, [every(180), every(180), every(180), every(180), every(120)]),
                row(AlbuminCreatinineRatio, [every(180), every(180), every(180), every(180), every(180)]),
                row(Hemoglobin, [every(365), every(365), every(365), every(365), every(180)]),
                row(Hematocrit, [every(365), every(365), every(365), every(365), every(180)]),
                row(ParathyroidHormone, [None, None, every(365), every(365), every(180)]),
                row(SerumAlbumin, [None, None, None, every(365), every(365)]),
                row(SerumPhosphorus, [None, None, None, every(365), every(365)]),
                row(CreatinineClearance24h, [every(365), every(180), every(180), every(180), every(90)]),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        serde_json::from_str(json)
            .map_err(|e| ScheduleError::ConfigParse("policy table".into(), e.to_string()))
    }

    /// Load an alternate table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ScheduleError::TableLoad(path.display().to_string(), e.to_string()))?;
        let table = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), exams = table.rows.len(), "Loaded interval policy table");
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, ScheduleError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScheduleError::ConfigParse("policy table".into(), e.to_string()))
    }

    // ─── Lookup ───────────────────────────────────────────────────────────────

    /// Policy for `exam` at `stage`; `None` when untracked or absent from the table.
    pub fn policy(&self, exam: Exam, stage: CkdStage) -> Option<IntervalPolicy> {
        self.rows
            .iter()
            .find(|r| r.exam == exam)
            .and_then(|r| r.stages.get(stage))
    }

    /// Exams in declaration order.
    pub fn catalogue(&self) -> impl Iterator<Item = Exam> + '_ {
        self.rows.iter().map(|r| r.exam)
    }

    pub fn rows(&self) -> &[ExamIntervals] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<ExamIntervals>> for IntervalTable {
    type Error = ScheduleError;

    fn try_from(rows: Vec<ExamIntervals>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<IntervalTable> for Vec<ExamIntervals> {
    fn from(table: IntervalTable) -> Self {
        table.rows
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
