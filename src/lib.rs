//! Laboratory follow-up scheduling for CKD and cardiovascular-risk programs.
//!
//! Given a patient's CKD stage, diabetes status and lab history, computes when
//! each follow-up test is next due and folds tests that land close together
//! into shared visit dates. Pure and synchronous: "today" is always passed in.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use nephro_agenda::{build_schedule, Exam, LabResult, PatientRecord};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let patient = PatientRecord::new(
//!     Some("E3B"),
//!     false,
//!     vec![LabResult::new(Exam::SerumCreatinine, 1.6, today)],
//! );
//! for item in &build_schedule(&patient, today) {
//!     println!("{} {} ({})", item.scheduled_date, item.exam.label(), item.reason);
//! }
//! ```

pub mod config;
pub mod models;
pub mod schedule;
pub mod staging;

pub use config::SchedulerConfig;
pub use models::{Agenda, AgendaItem, CkdStage, Exam, LabResult, PatientRecord};
pub use schedule::{
    build_schedule, unify, IntervalPolicy, IntervalTable, PolicySelector, ResultDrivenRules,
    ScheduleError, Scheduler,
};
pub use staging::{classify_clearance, normalize_stage};

use tracing_subscriber::EnvFilter;

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`config::default_log_filter`]. Safe to call more than once.
pub fn init_logging() {
    let initialized = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("{} v{} logging initialized", config::CRATE_NAME, config::CRATE_VERSION);
    }
}
