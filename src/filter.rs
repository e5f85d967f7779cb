//! Inclusive date-window selection over normalized observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::observation::Observation;

/// Inclusive `[start, end]` window on the count date.
///
/// An unset bound leaves that side open. `start > end` is allowed and
/// matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange::new(Some(start), Some(end))
    }

    /// Both bounds unset.
    pub fn open() -> Self {
        DateRange::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

/// Observations that fell inside a [`DateRange`]. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSet {
    observations: Vec<Observation>,
}

impl FilteredSet {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    /// The first `rows` observations, in input order.
    pub fn head(&self, rows: usize) -> &[Observation] {
        &self.observations[..rows.min(self.observations.len())]
    }
}

impl FromIterator<Observation> for FilteredSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        FilteredSet {
            observations: iter.into_iter().collect(),
        }
    }
}

/// Selects the observations whose count date lies in `range`, bounds included.
pub fn filter(rows: &[Observation], range: &DateRange) -> FilteredSet {
    let filtered: FilteredSet = rows
        .iter()
        .filter(|obs| range.contains(obs.count_date))
        .cloned()
        .collect();

    debug!(
        input = rows.len(),
        kept = filtered.len(),
        start = ?range.start,
        end = ?range.end,
        "Date range applied"
    );
    filtered
}
