//! Schedule builder: patient record + today → unified agenda.

use chrono::NaiveDate;

use super::due_date::next_date;
use super::policy::IntervalTable;
use super::selector::PolicySelector;
use super::unify::unify_within;
use super::ScheduleError;
use crate::config::SchedulerConfig;
use crate::models::agenda::{Agenda, AgendaItem};
use crate::models::enums::{CkdStage, Exam};
use crate::models::patient::PatientRecord;

/// Schedule with the standard stage table and default configuration.
pub fn build_schedule(patient: &PatientRecord, today: NaiveDate) -> Agenda {
    Scheduler::standard().build(patient, today)
}

/// A selection strategy plus tunables. Holds no per-patient state, so one
/// instance can serve any number of patients concurrently.
#[derive(Debug, Clone)]
pub struct Scheduler<S = IntervalTable> {
    selector: S,
    config: SchedulerConfig,
}

impl Scheduler<IntervalTable> {
    pub fn standard() -> Self {
        Self {
            selector: IntervalTable::standard(),
            config: SchedulerConfig::default(),
        }
    }
}

impl Default for Scheduler<IntervalTable> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: PolicySelector> Scheduler<S> {
    /// Fails when `config` does not validate.
    pub fn new(selector: S, config: SchedulerConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        Ok(Self { selector, config })
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Date-sorted agenda before unification.
    pub fn draft(&self, patient: &PatientRecord, today: NaiveDate) -> Agenda {
        self.draft_at(patient, patient.ckd_stage(), today)
    }

    /// Full schedule: draft, then unify nearby dates into shared visits.
    pub fn build(&self, patient: &PatientRecord, today: NaiveDate) -> Agenda {
        let stage = patient.ckd_stage();
        let draft = self.draft_at(patient, stage, today);
        let agenda = unify_within(draft, self.config.unification_window_days);

        tracing::info!(
            stage = stage.as_str(),
            items = agenda.len(),
            visits = agenda.visit_dates().len(),
            "Built lab follow-up agenda"
        );
        agenda
    }

    fn draft_at(&self, patient: &PatientRecord, stage: CkdStage, today: NaiveDate) -> Agenda {
        let reference = patient.reference_date(today);

        let mut items = Vec::new();
        for exam in self.selector.exams() {
            if exam == Exam::GlycatedHemoglobin && !patient.has_diabetes {
                tracing::debug!(exam = exam.as_str(), "Skipped: no diabetes diagnosis");
                continue;
            }
            let Some(selection) = self.selector.select(exam, stage, &patient.labs) else {
                tracing::debug!(
                    exam = exam.as_str(),
                    stage = stage.as_str(),
                    "Skipped: no interval policy"
                );
                continue;
            };

            let base = selection.base_date.unwrap_or(reference);
            let scheduled = next_date(base, selection.policy, today);
            items.push(AgendaItem::new(exam, scheduled, self.selector.reason(exam)));
        }

        let mut agenda = Agenda::new(items);
        agenda.sort_by_date();
        agenda
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lab::LabResult;
    use crate::schedule::policy::{ExamIntervals, IntervalPolicy, StagePolicies};
    use crate::schedule::selector::ResultDrivenRules;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn creatinine(value: f64, on: NaiveDate) -> LabResult {
        LabResult::new(Exam::SerumCreatinine, value, on).with_unit("mg/dL")
    }

    fn exams(agenda: &Agenda) -> Vec<Exam> {
        agenda.iter().map(|i| i.exam).collect()
    }

    fn assert_sorted(agenda: &Agenda) {
        assert!(agenda
            .items()
            .windows(2)
            .all(|w| w[0].scheduled_date <= w[1].scheduled_date));
    }

    // ── Stage table ─────────────────────────────────────────

    #[test]
    fn stage3b_end_to_end() {
        let patient = PatientRecord::new(
            Some("E3B"),
            false,
            vec![creatinine(1.6, date(2025, 1, 1))],
        );
        let agenda = build_schedule(&patient, date(2025, 1, 1));

        assert_eq!(agenda.len(), 13);
        assert!(!agenda.contains(Exam::GlycatedHemoglobin));
        assert_eq!(
            exams(&agenda),
            vec![
                Exam::SerumCreatinine,
                Exam::Urinalysis,
                Exam::FastingGlucose,
                Exam::TotalCholesterol,
                Exam::LdlCholesterol,
                Exam::Triglycerides,
                Exam::AlbuminCreatinineRatio,
                Exam::CreatinineClearance24h,
                Exam::Hemoglobin,
                Exam::Hematocrit,
                Exam::ParathyroidHormone,
                Exam::SerumAlbumin,
                Exam::SerumPhosphorus,
            ]
        );
        assert_eq!(agenda.get(Exam::SerumCreatinine).unwrap().scheduled_date, date(2025, 4, 1));
        assert_eq!(agenda.get(Exam::LdlCholesterol).unwrap().scheduled_date, date(2025, 6, 30));
        assert_eq!(agenda.get(Exam::SerumPhosphorus).unwrap().scheduled_date, date(2026, 1, 1));
        assert_eq!(
            agenda.visit_dates(),
            vec![date(2025, 4, 1), date(2025, 6, 30), date(2026, 1, 1)]
        );
        assert_sorted(&agenda);
    }

    #[test]
    fn reason_derived_from_exam_name() {
        let patient = PatientRecord::new(Some("E1"), false, vec![]);
        let agenda = build_schedule(&patient, date(2025, 1, 1));
        assert_eq!(
            agenda.get(Exam::Urinalysis).unwrap().reason,
            "follow-up: urinalysis"
        );
    }

    #[test]
    fn early_stages_never_schedule_untracked_exams() {
        for stage in ["E1", "E2"] {
            let patient = PatientRecord::new(Some(stage), true, vec![]);
            let agenda = build_schedule(&patient, date(2025, 1, 1));
            assert!(!agenda.contains(Exam::ParathyroidHormone), "stage {stage}");
            assert!(!agenda.contains(Exam::SerumAlbumin), "stage {stage}");
            assert!(!agenda.contains(Exam::SerumPhosphorus), "stage {stage}");
        }
    }

    #[test]
    fn hba1c_only_for_diabetics() {
        let labs = vec![LabResult::new(Exam::GlycatedHemoglobin, 8.1, date(2025, 2, 1))];
        for stage in CkdStage::ALL {
            let no_dm = PatientRecord::new(Some(stage.as_str()), false, labs.clone());
            let dm = PatientRecord::new(Some(stage.as_str()), true, labs.clone());
            assert!(!build_schedule(&no_dm, date(2025, 3, 1)).contains(Exam::GlycatedHemoglobin));
            assert!(build_schedule(&dm, date(2025, 3, 1)).contains(Exam::GlycatedHemoglobin));
        }
    }

    #[test]
    fn unknown_stage_schedules_as_stage1() {
        let unknown = PatientRecord::new(Some("E5"), true, vec![]);
        let stage1 = PatientRecord::new(Some("E1"), true, vec![]);
        let today = date(2025, 8, 20);
        assert_eq!(build_schedule(&unknown, today), build_schedule(&stage1, today));
    }

    #[test]
    fn no_results_counts_from_today() {
        let patient = PatientRecord::new(Some("E4"), false, vec![]);
        let today = date(2025, 1, 1);
        let draft = Scheduler::standard().draft(&patient, today);
        // stage 4 creatinine (60, 93): today + 60
        assert_eq!(draft.get(Exam::SerumCreatinine).unwrap().scheduled_date, date(2025, 3, 2));
        assert_eq!(draft.get(Exam::FastingGlucose).unwrap().scheduled_date, date(2025, 3, 2));
        assert_eq!(draft.len(), 13);
    }

    #[test]
    fn overdue_patient_rescheduled_from_today() {
        let patient = PatientRecord::new(Some("3A"), false, vec![creatinine(1.3, date(2025, 1, 1))]);
        let draft = Scheduler::standard().draft(&patient, date(2025, 5, 5));
        assert_eq!(
            draft.get(Exam::SerumCreatinine).unwrap().scheduled_date,
            date(2025, 9, 3)
        );
    }

    #[test]
    fn base_is_latest_result_of_any_exam() {
        let patient = PatientRecord::new(
            Some("E2"),
            false,
            vec![
                creatinine(1.0, date(2025, 1, 1)),
                LabResult::new(Exam::Hemoglobin, 13.2, date(2025, 2, 1)),
            ],
        );
        let draft = Scheduler::standard().draft(&patient, date(2025, 2, 1));
        // 180 days from 2025-02-01, not from the older creatinine sample
        assert_eq!(
            draft.get(Exam::SerumCreatinine).unwrap().scheduled_date,
            date(2025, 7, 31)
        );
    }

    #[test]
    fn draft_keeps_catalogue_order_on_ties() {
        let patient = PatientRecord::new(Some("E1"), false, vec![]);
        let draft = Scheduler::standard().draft(&patient, date(2025, 1, 1));
        let same_day: Vec<Exam> = draft
            .iter()
            .filter(|i| i.scheduled_date == date(2025, 6, 30))
            .map(|i| i.exam)
            .collect();
        assert_eq!(
            same_day,
            vec![
                Exam::Urinalysis,
                Exam::SerumCreatinine,
                Exam::FastingGlucose,
                Exam::TotalCholesterol,
                Exam::LdlCholesterol,
                Exam::Triglycerides,
                Exam::AlbuminCreatinineRatio,
            ]
        );
    }

    #[test]
    fn output_invariants_hold_across_stages() {
        let labs = vec![
            creatinine(1.4, date(2024, 11, 3)),
            LabResult::new(Exam::LdlCholesterol, 142.0, date(2025, 1, 20)),
        ];
        for stage in CkdStage::ALL {
            let patient = PatientRecord::new(Some(stage.as_str()), true, labs.clone());
            for today in [date(2025, 1, 20), date(2025, 4, 30), date(2026, 2, 1)] {
                let agenda = build_schedule(&patient, today);
                assert_sorted(&agenda);
                for item in &agenda {
                    assert_eq!(item.review_date, item.scheduled_date + Duration::days(7));
                    assert!(item.scheduled_date > today);
                }
                assert_eq!(crate::schedule::unify(agenda.clone()), agenda);
            }
        }
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let patient = PatientRecord::new(Some("E4"), true, vec![creatinine(2.1, date(2025, 3, 3))]);
        let a = build_schedule(&patient, date(2025, 6, 1));
        let b = build_schedule(&patient, date(2025, 6, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn custom_table_injected() {
        let table = IntervalTable::new(vec![
            ExamIntervals {
                exam: Exam::Hemoglobin,
                stages: StagePolicies {
                    stage1: Some(IntervalPolicy::fixed(30)),
                    ..Default::default()
                },
            },
            ExamIntervals {
                exam: Exam::Urinalysis,
                stages: StagePolicies {
                    stage1: Some(IntervalPolicy::fixed(60)),
                    ..Default::default()
                },
            },
        ])
        .unwrap();
        let scheduler = Scheduler::new(table, SchedulerConfig::default()).unwrap();
        let agenda = scheduler.build(&PatientRecord::default(), date(2025, 1, 1));
        assert_eq!(exams(&agenda), vec![Exam::Hemoglobin, Exam::Urinalysis]);
        assert_eq!(agenda.visit_dates(), vec![date(2025, 1, 31), date(2025, 3, 2)]);
    }

    #[test]
    fn wider_window_merges_more() {
        let patient = PatientRecord::new(Some("E3B"), false, vec![creatinine(1.6, date(2025, 1, 1))]);
        let scheduler = Scheduler::new(
            IntervalTable::standard(),
            SchedulerConfig {
                unification_window_days: 100,
            },
        )
        .unwrap();
        let agenda = scheduler.build(&patient, date(2025, 1, 1));
        // Apr 1 anchor pulls in the Jun 30 group (90 days later)
        assert_eq!(agenda.visit_dates(), vec![date(2025, 4, 1), date(2026, 1, 1)]);
    }

    #[test]
    fn negative_window_rejected_at_construction() {
        let err = Scheduler::new(
            IntervalTable::standard(),
            SchedulerConfig {
                unification_window_days: -1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }

    #[test]
    fn draft_and_build_agree_on_unknown_stage() {
        let patient = PatientRecord::new(Some("stage 9"), false, vec![]);
        let scheduler = Scheduler::standard();
        let today = date(2025, 1, 1);
        let draft = scheduler.draft(&patient, today);
        let built = scheduler.build(&patient, today);
        assert_eq!(draft.len(), built.len());
        assert!(!built.contains(Exam::ParathyroidHormone));
    }

    // ── Result-driven rules ─────────────────────────────────

    fn result_driven() -> Scheduler<ResultDrivenRules> {
        Scheduler::new(ResultDrivenRules::default(), SchedulerConfig::default()).unwrap()
    }

    #[test]
    fn result_driven_in_target_values() {
        let patient = PatientRecord::new(
            None,
            true,
            vec![
                creatinine(1.2, date(2025, 1, 1)),
                LabResult::new(Exam::GlycatedHemoglobin, 6.8, date(2025, 2, 1)),
                LabResult::new(Exam::LdlCholesterol, 120.0, date(2025, 3, 1)),
            ],
        );
        let agenda = result_driven().build(&patient, date(2025, 3, 15));
        assert_eq!(
            exams(&agenda),
            vec![Exam::SerumCreatinine, Exam::GlycatedHemoglobin, Exam::LdlCholesterol]
        );
        assert_eq!(
            agenda.visit_dates(),
            vec![date(2025, 4, 1), date(2025, 7, 31), date(2026, 3, 1)]
        );
        assert_eq!(agenda.items()[0].reason, "renal function follow-up");
    }

    #[test]
    fn result_driven_out_of_target_values() {
        let patient = PatientRecord::new(
            None,
            true,
            vec![
                creatinine(1.2, date(2025, 1, 1)),
                LabResult::new(Exam::GlycatedHemoglobin, 7.4, date(2025, 2, 1)),
                LabResult::new(Exam::LdlCholesterol, 150.0, date(2025, 3, 1)),
            ],
        );
        let agenda = result_driven().build(&patient, date(2025, 3, 15));
        assert_eq!(
            agenda.visit_dates(),
            vec![date(2025, 4, 1), date(2025, 5, 2), date(2025, 5, 30)]
        );
    }

    #[test]
    fn result_driven_merges_close_tests() {
        let patient = PatientRecord::new(
            None,
            true,
            vec![
                creatinine(1.2, date(2025, 1, 1)),
                LabResult::new(Exam::GlycatedHemoglobin, 7.9, date(2025, 1, 5)),
            ],
        );
        let agenda = result_driven().build(&patient, date(2025, 3, 15));
        let hba1c = agenda.get(Exam::GlycatedHemoglobin).unwrap();
        assert_eq!(hba1c.scheduled_date, date(2025, 4, 1));
        assert_eq!(hba1c.review_date, date(2025, 4, 8));
    }

    #[test]
    fn result_driven_respects_diabetes_gate() {
        let patient = PatientRecord::new(
            None,
            false,
            vec![LabResult::new(Exam::GlycatedHemoglobin, 9.0, date(2025, 2, 1))],
        );
        assert!(result_driven().build(&patient, date(2025, 3, 1)).is_empty());
    }

    #[test]
    fn result_driven_without_results_is_empty() {
        assert!(result_driven()
            .build(&PatientRecord::default(), date(2025, 3, 1))
            .is_empty());
    }

    #[test]
    fn result_driven_overdue_result_rescheduled_from_today() {
        let patient = PatientRecord::new(None, false, vec![creatinine(1.2, date(2024, 6, 1))]);
        let agenda = result_driven().build(&patient, date(2025, 3, 1));
        assert_eq!(agenda.items()[0].scheduled_date, date(2025, 5, 30));
    }
}
