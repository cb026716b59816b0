//! Dashboard-facing metric sets
//!
//! Thin formatting over [`aggregate`](super::aggregate); every view here is
//! rebuilt from the records it is handed.

use super::aggregate::{
    DateRange, DeliveryBoyStats, SummaryAggregate, aggregate, aggregate_by_delivery_boy,
    same_month, windowed_count,
};
use super::filter::DeliveryFilter;
use crate::models::{DailyReport, DeliveryBoyDailyLine, DeliveryRecord, DeliveryStatus, Person};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round a `[0, 1]` fraction to a whole display percentage
pub fn percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// One slice of the status pie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusSlice {
    pub status: DeliveryStatus,
    pub count: u64,
    /// `count / total`, `0` when there are no deliveries
    pub fraction: f64,
}

impl StatusSlice {
    pub fn percent(&self) -> u32 {
        percent(self.fraction)
    }
}

/// Admin dashboard header cards plus the status distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub total_deliveries: u64,
    pub delivered_count: u64,
    pub pending_count: u64,
    pub issue_count: u64,
    pub total_quantity: f64,
    pub distribution: Vec<StatusSlice>,
}

/// Pie order used by the dashboard
const SLICE_ORDER: [DeliveryStatus; 3] = [
    DeliveryStatus::Delivered,
    DeliveryStatus::Pending,
    DeliveryStatus::Issue,
];

impl AdminDashboard {
    pub fn from_summary(summary: &SummaryAggregate) -> Self {
        let total = summary.total_deliveries;
        let distribution = SLICE_ORDER
            .iter()
            .map(|&status| {
                let count = summary.count_of(status);
                let fraction = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                StatusSlice {
                    status,
                    count,
                    fraction,
                }
            })
            .collect();

        Self {
            total_deliveries: summary.total_deliveries,
            delivered_count: summary.delivered_count,
            pending_count: summary.pending_count,
            issue_count: summary.issue_count,
            total_quantity: summary.total_quantity,
            distribution,
        }
    }
}

/// Admin view over a record set
pub fn admin_dashboard(records: &[DeliveryRecord]) -> AdminDashboard {
    AdminDashboard::from_summary(&aggregate(records))
}

/// Delivery boy's own header cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalStats {
    pub total: u64,
    pub delivered: u64,
    pub pending: u64,
}

/// Stats scoped to `delivery_boy_id`'s records
pub fn personal_stats(records: &[DeliveryRecord], delivery_boy_id: &str) -> PersonalStats {
    let mine = DeliveryFilter::new()
        .delivery_boy(delivery_boy_id)
        .apply(records);
    let agg = aggregate(mine);
    PersonalStats {
        total: agg.total_deliveries,
        delivered: agg.delivered_count,
        pending: agg.pending_count,
    }
}

/// Customer's history header cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerHistoryStats {
    pub total: u64,
    pub delivered: u64,
    pub issues: u64,
    pub this_month: u64,
}

/// Stats scoped to `customer_id`'s records; "this month" is relative to `today`
pub fn customer_history(
    records: &[DeliveryRecord],
    customer_id: &str,
    today: NaiveDate,
) -> CustomerHistoryStats {
    let theirs = DeliveryFilter::new().customer(customer_id).apply(records);
    let agg = aggregate(theirs.iter().copied());
    CustomerHistoryStats {
        total: agg.total_deliveries,
        delivered: agg.delivered_count,
        issues: agg.issue_count,
        this_month: windowed_count(theirs.iter().copied(), |d| same_month(d, today)),
    }
}

/// One row of the delivery boy roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub delivery_boy: Person,
    pub stats: DeliveryBoyStats,
}

impl RosterEntry {
    /// Rounded percentage shown next to the bar; the fraction stays exact
    pub fn display_percent(&self) -> u32 {
        percent(self.stats.success_rate)
    }

    /// `completed/total` label
    pub fn completed_label(&self) -> String {
        format!(
            "{}/{}",
            self.stats.completed_deliveries, self.stats.total_deliveries
        )
    }
}

/// Roster rows in `people` order; people without deliveries get zeroed stats
pub fn roster(people: &[Person], records: &[DeliveryRecord]) -> Vec<RosterEntry> {
    let groups = aggregate_by_delivery_boy(records);
    people
        .iter()
        .map(|p| RosterEntry {
            delivery_boy: p.clone(),
            stats: groups
                .get(&p.id)
                .map(DeliveryBoyStats::from)
                .unwrap_or_default(),
        })
        .collect()
}

/// Roster header cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterTotals {
    pub total: u64,
    pub active: u64,
    pub total_deliveries: u64,
    pub completed_deliveries: u64,
}

pub fn roster_totals(entries: &[RosterEntry]) -> RosterTotals {
    entries.iter().fold(RosterTotals::default(), |mut acc, e| {
        acc.total += 1;
        if e.delivery_boy.is_active() {
            acc.active += 1;
        }
        acc.total_deliveries += e.stats.total_deliveries;
        acc.completed_deliveries += e.stats.completed_deliveries;
        acc
    })
}

/// Latest `n` deliveries by date, newest first; ties keep input order
pub fn recent_deliveries(records: &[DeliveryRecord], n: usize) -> Vec<&DeliveryRecord> {
    let mut sorted: Vec<&DeliveryRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.delivery_date.cmp(&a.delivery_date));
    sorted.truncate(n);
    sorted
}

/// Local daily report: overall numbers for `date` plus one line per
/// delivery boy that `resolve` can find. Unresolved ids are left out of the
/// per-boy lines but still count in the overall numbers.
pub fn daily_report<F>(records: &[DeliveryRecord], date: NaiveDate, resolve: F) -> DailyReport
where
    F: Fn(&str) -> Option<Person>,
{
    let day = DateRange::day(date);
    let todays = DeliveryFilter::new().within(day).apply(records);

    let delivery_boys = aggregate_by_delivery_boy(todays.iter().copied())
        .into_iter()
        .filter_map(|(id, statistics)| match resolve(&id) {
            Some(delivery_boy) => Some(DeliveryBoyDailyLine {
                delivery_boy,
                statistics,
            }),
            None => {
                tracing::debug!(delivery_boy_id = %id, %date, "Skipping unresolved delivery boy in daily report");
                None
            }
        })
        .collect();

    DailyReport {
        date,
        overall_statistics: aggregate(todays),
        delivery_boys,
    }
}
