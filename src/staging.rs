//! CKD stage resolution.
//!
//! Intake supplies stages as loose tokens (`E3A`, `3a`, `Stage 3B`, `G4`).
//! Scheduling never fails on a bad token: anything unrecognized resolves to
//! [`CkdStage::Stage1`]. Stage 5 (kidney failure) has no follow-up policies
//! and is not representable here.

use crate::models::enums::CkdStage;

/// Resolve a raw stage token. Missing or unrecognized tokens give `Stage1`.
pub fn normalize_stage(token: Option<&str>) -> CkdStage {
    let Some(raw) = token else {
        tracing::debug!("No CKD stage supplied, defaulting to stage1");
        return CkdStage::Stage1;
    };

    match parse_stage_token(raw) {
        Some(stage) => stage,
        None => {
            if !raw.trim().is_empty() {
                tracing::warn!(token = raw, "Unrecognized CKD stage, defaulting to stage1");
            }
            CkdStage::Stage1
        }
    }
}

/// Lenient parse of a stage token; `None` when it names no tracked stage.
pub fn parse_stage_token(raw: &str) -> Option<CkdStage> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_uppercase();

    let digits = ["STAGE", "CKD", "E", "G"]
        .iter()
        .find_map(|prefix| compact.strip_prefix(prefix))
        .unwrap_or(compact.as_str());

    match digits {
        "1" => Some(CkdStage::Stage1),
        "2" => Some(CkdStage::Stage2),
        "3A" => Some(CkdStage::Stage3A),
        "3B" => Some(CkdStage::Stage3B),
        "4" => Some(CkdStage::Stage4),
        _ => None,
    }
}

/// Stage for a creatinine clearance / GFR estimate in mL/min.
///
/// Below 15 mL/min is kidney failure, which this follow-up table does not
/// cover, so it yields `None` (as do negative and non-finite inputs).
pub fn classify_clearance(ml_per_min: f64) -> Option<CkdStage> {
    if !ml_per_min.is_finite() || ml_per_min < 0.0 {
        return None;
    }
    match ml_per_min {
        v if v >= 90.0 => Some(CkdStage::Stage1),
        v if v >= 60.0 => Some(CkdStage::Stage2),
        v if v >= 45.0 => Some(CkdStage::Stage3A),
        v if v >= 30.0 => Some(CkdStage::Stage3B),
        v if v >= 15.0 => Some(CkdStage::Stage4),
        _ => None,
    }
}
