pub mod agenda;
pub mod enums;
pub mod lab;
pub mod patient;

pub use agenda::{Agenda, AgendaItem};
pub use enums::{CkdStage, Exam};
pub use lab::{latest_result, latest_sample_date, LabResult};
pub use patient::PatientRecord;
