//! Next-occurrence rule for a single exam.
//!
//! `limit = base + evaluate_days`. Once `limit` has been reached (including
//! the day itself) the test is overdue and is rescheduled `reschedule_days`
//! after today; otherwise it is scheduled on `limit`. Dates past the end of
//! the calendar clamp to `NaiveDate::MAX`.

use chrono::{Duration, NaiveDate};

use super::policy::IntervalPolicy;

/// True once the evaluation window since `base` has run out as of `today`.
pub fn is_due(base: NaiveDate, policy: IntervalPolicy, today: NaiveDate) -> bool {
    evaluation_limit(base, policy) <= today
}

/// Scheduled date for the next occurrence. `today` is always explicit.
pub fn next_date(base: NaiveDate, policy: IntervalPolicy, today: NaiveDate) -> NaiveDate {
    let limit = evaluation_limit(base, policy);
    if limit <= today {
        add_days(today, policy.reschedule_days)
    } else {
        limit
    }
}

fn evaluation_limit(base: NaiveDate, policy: IntervalPolicy) -> NaiveDate {
    add_days(base, policy.evaluate_days)
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
