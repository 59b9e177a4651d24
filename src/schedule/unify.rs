//! Visit unification: tests scheduled close together share one date.
//!
//! After a stable date sort the list is scanned left to right. Each group is
//! anchored on its first item and takes every following item whose date is
//! within the window of that anchor (inclusive). Members of a group move to
//! the anchor's date; scanning resumes at the first item outside the group.
//! The window is measured from the anchor, never chained item to item, so a
//! group never spans more than the window.

use crate::config::DEFAULT_UNIFICATION_WINDOW_DAYS;
use crate::models::agenda::{Agenda, AgendaItem};

/// Unify with the default 14-day window.
pub fn unify(agenda: Agenda) -> Agenda {
    unify_within(agenda, DEFAULT_UNIFICATION_WINDOW_DAYS)
}

pub fn unify_within(mut agenda: Agenda, window_days: i64) -> Agenda {
    unify_in_place(agenda.items_mut(), window_days);
    agenda
}

/// In-place variant. Also re-derives every review date, so the
/// review-date invariant holds for any input.
pub fn unify_in_place(items: &mut [AgendaItem], window_days: i64) {
    items.sort_by_key(|i| i.scheduled_date);

    let mut start = 0;
    while start < items.len() {
        let anchor = items[start].scheduled_date;
        let mut end = start + 1;
        while end < items.len() && (items[end].scheduled_date - anchor).num_days() <= window_days {
            end += 1;
        }

        if end - start > 1 {
            tracing::debug!(
                anchor = %anchor,
                merged = end - start,
                "Unified lab tests onto one visit"
            );
        }
        for item in &mut items[start..end] {
            item.reschedule(anchor);
        }

        start = end;
    }
}
