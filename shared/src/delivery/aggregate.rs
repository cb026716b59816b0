//! Aggregation over delivery collections
//!
//! Every aggregate is recomputed from the record set it is given; nothing
//! here keeps state between calls.

use crate::models::{DeliveryRecord, DeliveryStatus};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts and volume folded over a set of deliveries
///
/// Serialized field names match the backend's `/reports/summary` body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryAggregate {
    pub total_deliveries: u64,
    pub delivered_count: u64,
    pub pending_count: u64,
    pub issue_count: u64,
    /// Liters across all records regardless of status
    pub total_quantity: f64,
}

impl SummaryAggregate {
    fn push(mut self, record: &DeliveryRecord) -> Self {
        self.total_deliveries += 1;
        match record.status {
            DeliveryStatus::Pending => self.pending_count += 1,
            DeliveryStatus::Delivered => self.delivered_count += 1,
            DeliveryStatus::Issue => self.issue_count += 1,
        }
        self.total_quantity += record.quantity;
        self
    }

    /// Count for one status
    pub fn count_of(&self, status: DeliveryStatus) -> u64 {
        match status {
            DeliveryStatus::Pending => self.pending_count,
            DeliveryStatus::Delivered => self.delivered_count,
            DeliveryStatus::Issue => self.issue_count,
        }
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.delivered_count, self.total_deliveries)
    }
}

/// Single pass over `records`
pub fn aggregate<'a, I>(records: I) -> SummaryAggregate
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    records
        .into_iter()
        .fold(SummaryAggregate::default(), SummaryAggregate::push)
}

/// `completed / total`, or `0.0` when `total == 0`
pub fn success_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}

/// Number of records whose delivery date satisfies `predicate`
pub fn windowed_count<'a, I, P>(records: I, predicate: P) -> u64
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
    P: Fn(NaiveDate) -> bool,
{
    records
        .into_iter()
        .filter(|r| predicate(r.delivery_date))
        .count() as u64
}

/// Calendar month/year equality. The day of month is irrelevant.
pub fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.month() == reference.month() && date.year() == reference.year()
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The report endpoints only filter when both bounds are supplied
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// [`aggregate`] restricted to `range`
pub fn aggregate_in_range<'a, I>(records: I, range: &DateRange) -> SummaryAggregate
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    aggregate(
        records
            .into_iter()
            .filter(|r| range.contains(r.delivery_date)),
    )
}

/// One aggregate per delivery boy id, in id order
pub fn aggregate_by_delivery_boy<'a, I>(records: I) -> BTreeMap<String, SummaryAggregate>
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    let mut groups: BTreeMap<String, SummaryAggregate> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.delivery_boy_id.clone()).or_default();
        *entry = entry.push(record);
    }
    groups
}

/// Performance figures for one delivery boy (derived, never stored)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryBoyStats {
    pub total_deliveries: u64,
    pub completed_deliveries: u64,
    /// Fraction in `[0, 1]`
    pub success_rate: f64,
}

impl From<&SummaryAggregate> for DeliveryBoyStats {
    fn from(agg: &SummaryAggregate) -> Self {
        Self {
            total_deliveries: agg.total_deliveries,
            completed_deliveries: agg.delivered_count,
            success_rate: success_rate(agg.delivered_count, agg.total_deliveries),
        }
    }
}
