use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::CkdStage;
use super::lab::{latest_sample_date, LabResult};
use crate::staging::normalize_stage;

/// The slice of a patient record the scheduler reads.
///
/// `stage` is kept as the raw token supplied by intake; it is normalized on
/// every read so malformed values never fail a schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub has_diabetes: bool,
    #[serde(default)]
    pub labs: Vec<LabResult>,
}

impl PatientRecord {
    pub fn new(stage: Option<&str>, has_diabetes: bool, labs: Vec<LabResult>) -> Self {
        Self {
            stage: stage.map(str::to_string),
            has_diabetes,
            labs,
        }
    }

    pub fn ckd_stage(&self) -> CkdStage {
        normalize_stage(self.stage.as_deref())
    }

    /// Date the stage-table schedule is computed from: the latest sample,
    /// or `today` when the patient has no results yet.
    pub fn reference_date(&self, today: NaiveDate) -> NaiveDate {
        latest_sample_date(&self.labs).unwrap_or(today)
    }
}
