use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::Exam;

/// A single laboratory result, already mapped to the exam catalogue upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub exam: Exam,
    pub value: f64,
    pub unit: Option<String>,
    pub sample_date: NaiveDate,
}

impl LabResult {
    pub fn new(exam: Exam, value: f64, sample_date: NaiveDate) -> Self {
        Self {
            exam,
            value,
            unit: None,
            sample_date,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Most recent result for `exam`. On equal dates the later entry wins.
pub fn latest_result(labs: &[LabResult], exam: Exam) -> Option<&LabResult> {
    labs.iter()
        .filter(|l| l.exam == exam)
        .max_by_key(|l| l.sample_date)
}

/// Most recent sample date across all results, if any.
pub fn latest_sample_date(labs: &[LabResult]) -> Option<NaiveDate> {
    labs.iter().map(|l| l.sample_date).max()
}
