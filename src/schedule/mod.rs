//! Laboratory follow-up scheduling.
//!
//! An interval policy per (exam, stage) decides when each test is next due;
//! the builder turns a patient's record into a date-sorted agenda and the
//! unification pass folds tests that land close together into one visit.

pub mod builder;
pub mod due_date;
pub mod policy;
pub mod selector;
pub mod unify;

pub use builder::{build_schedule, Scheduler};
pub use due_date::{is_due, next_date};
pub use policy::{ExamIntervals, IntervalPolicy, IntervalTable, StagePolicies};
pub use selector::{PolicySelector, ResultDrivenRules, Selection};
pub use unify::{unify, unify_in_place, unify_within};

use thiserror::Error;

use crate::models::enums::{CkdStage, Exam};

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Policy table load failed ({0}): {1}")]
    TableLoad(String, String),

    #[error("Configuration parse failed ({0}): {1}")]
    ConfigParse(String, String),

    #[error("Exam listed more than once in policy table: {}", .0.as_str())]
    DuplicateExam(Exam),

    #[error("Zero-day interval for {} at {}", .exam.as_str(), .stage.as_str())]
    ZeroInterval { exam: Exam, stage: CkdStage },

    #[error(
        "Interval of {days} days for {} at {} exceeds the {max}-day limit",
        .exam.as_str(),
        .stage.as_str(),
        max = crate::config::MAX_INTERVAL_DAYS
    )]
    IntervalTooLong { exam: Exam, stage: CkdStage, days: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
