use crate::schedule::ScheduleError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ScheduleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ScheduleError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Exam {
    Urinalysis => "urinalysis",
    SerumCreatinine => "serum_creatinine",
    FastingGlucose => "fasting_glucose",
    TotalCholesterol => "total_cholesterol",
    LdlCholesterol => "ldl_cholesterol",
    Triglycerides => "triglycerides",
    GlycatedHemoglobin => "glycated_hemoglobin",
    AlbuminCreatinineRatio => "albumin_creatinine_ratio",
    Hemoglobin => "hemoglobin",
    Hematocrit => "hematocrit",
    ParathyroidHormone => "parathyroid_hormone",
    SerumAlbumin => "serum_albumin",
    SerumPhosphorus => "serum_phosphorus",
    CreatinineClearance24h => "creatinine_clearance_24h",
});

str_enum!(CkdStage {
    Stage1 => "stage1",
    Stage2 => "stage2",
    Stage3A => "stage3a",
    Stage3B => "stage3b",
    Stage4 => "stage4",
});

impl Exam {
    /// Human-readable name, used in agenda reasons and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urinalysis => "Urinalysis",
            Self::SerumCreatinine => "Serum creatinine",
            Self::FastingGlucose => "Fasting glucose",
            Self::TotalCholesterol => "Total cholesterol",
            Self::LdlCholesterol => "LDL cholesterol",
            Self::Triglycerides => "Triglycerides",
            Self::GlycatedHemoglobin => "Glycated hemoglobin (HbA1c)",
            Self::AlbuminCreatinineRatio => "Albumin/creatinine ratio",
            Self::Hemoglobin => "Hemoglobin",
            Self::Hematocrit => "Hematocrit",
            Self::ParathyroidHormone => "Parathyroid hormone (PTH)",
            Self::SerumAlbumin => "Serum albumin",
            Self::SerumPhosphorus => "Serum phosphorus",
            Self::CreatinineClearance24h => "24-hour creatinine clearance",
        }
    }
}

impl CkdStage {
    /// Short clinical description of renal function at this stage.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Stage1 => "Normal or high kidney function",
            Self::Stage2 => "Mildly decreased kidney function",
            Self::Stage3A => "Mildly to moderately decreased kidney function",
            Self::Stage3B => "Moderately to severely decreased kidney function",
            Self::Stage4 => "Severely decreased kidney function",
        }
    }
}

impl Default for CkdStage {
    fn default() -> Self {
        Self::Stage1
    }
}
