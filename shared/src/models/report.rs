//! Report Models (`/reports/*`)
//!
//! The statistics block of every report has the same shape as
//! [`SummaryAggregate`], so the backend's numbers and the locally folded
//! numbers are directly comparable.

use super::{Customer, DeliveryStatus, Person};
use crate::delivery::SummaryAggregate;
use crate::util::utc_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// `GET /reports/summary` body
pub type DeliverySummary = SummaryAggregate;

/// One line of a customer's delivery history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDeliveryLine {
    pub date: NaiveDate,
    pub status: DeliveryStatus,
    pub quantity: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "utc_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// `GET /reports/customer/{id}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerReport {
    pub customer: Customer,
    pub deliveries: Vec<CustomerDeliveryLine>,
}

/// `GET /reports/delivery-boy/{id}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryBoyReport {
    pub delivery_boy: Person,
    pub statistics: SummaryAggregate,
}

/// Per delivery boy block of the daily report
pub type DeliveryBoyDailyLine = DeliveryBoyReport;

/// `GET /reports/daily/{date}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub overall_statistics: SummaryAggregate,
    #[serde(default)]
    pub delivery_boys: Vec<DeliveryBoyDailyLine>,
}
