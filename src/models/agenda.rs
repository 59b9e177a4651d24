use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::enums::Exam;
use crate::config::REVIEW_OFFSET_DAYS;

/// One scheduled laboratory test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub exam: Exam,
    pub scheduled_date: NaiveDate,
    pub reason: String,
    pub review_date: NaiveDate,
}

impl AgendaItem {
    pub fn new(exam: Exam, scheduled_date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            exam,
            scheduled_date,
            reason: reason.into(),
            review_date: review_date_for(scheduled_date),
        }
    }

    /// Move the test to `date`, keeping the review checkpoint in step.
    pub fn reschedule(&mut self, date: NaiveDate) {
        self.scheduled_date = date;
        self.review_date = review_date_for(date);
    }
}

pub fn review_date_for(scheduled: NaiveDate) -> NaiveDate {
    scheduled + Duration::days(REVIEW_OFFSET_DAYS)
}

/// Ordered list of upcoming tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Agenda {
    items: Vec<AgendaItem>,
}

impl Agenda {
    pub fn new(items: Vec<AgendaItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[AgendaItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<AgendaItem> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<AgendaItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgendaItem> {
        self.items.iter()
    }

    pub fn get(&self, exam: Exam) -> Option<&AgendaItem> {
        self.items.iter().find(|i| i.exam == exam)
    }

    pub fn contains(&self, exam: Exam) -> bool {
        self.get(exam).is_some()
    }

    /// Distinct visit dates, ascending.
    pub fn visit_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.items.iter().map(|i| i.scheduled_date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Stable ascending sort by scheduled date; ties keep insertion order.
    pub fn sort_by_date(&mut self) {
        self.items.sort_by_key(|i| i.scheduled_date);
    }
}

impl From<Vec<AgendaItem>> for Agenda {
    fn from(items: Vec<AgendaItem>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for Agenda {
    type Item = AgendaItem;
    type IntoIter = std::vec::IntoIter<AgendaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Agenda {
    type Item = &'a AgendaItem;
    type IntoIter = std::slice::Iter<'a, AgendaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
