//! Search and filter predicates
//!
//! Text matching is a case-insensitive substring test. Filters never reorder:
//! output keeps the relative order of the input.

use super::aggregate::DateRange;
use crate::error::{AppError, ErrorCode};
use crate::models::{Customer, DeliveryRecord, DeliveryStatus, Person};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status dropdown value: `"all"` or one concrete status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(DeliveryStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: DeliveryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<DeliveryStatus>().map(Self::Only).map_err(|_| {
            AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("Unknown status filter: {}", s),
            )
        })
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl From<DeliveryStatus> for StatusFilter {
    fn from(status: DeliveryStatus) -> Self {
        Self::Only(status)
    }
}

/// Lower-cased query; empty matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Needle(String);

impl Needle {
    fn new(query: &str) -> Self {
        Self(query.to_lowercase())
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    fn found_in_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        self.is_empty() || fields.into_iter().flatten().any(|f| self.found_in(f))
    }
}

/// Text match against the denormalized customer name, delivery boy name and
/// customer address. Missing projections simply don't match.
pub fn text_matches(record: &DeliveryRecord, query: &str) -> bool {
    Needle::new(query).found_in_any([
        record.customer_name(),
        record.delivery_boy_name(),
        record.customer_address(),
    ])
}

/// Text match AND status match
pub fn matches(record: &DeliveryRecord, query: &str, status: StatusFilter) -> bool {
    status.matches(record.status) && text_matches(record, query)
}

/// Name, username or mobile number
pub fn person_matches(person: &Person, query: &str) -> bool {
    Needle::new(query).found_in_any([
        Some(person.name.as_str()),
        Some(person.username.as_str()),
        Some(person.mobile.as_str()),
    ])
}

/// Name, address or mobile number
pub fn customer_matches(customer: &Customer, query: &str) -> bool {
    Needle::new(query).found_in_any([
        Some(customer.name.as_str()),
        Some(customer.address.as_str()),
        Some(customer.mobile.as_str()),
    ])
}

/// Composite delivery filter
///
/// Every criterion that is set must hold. The default filter passes all
/// records.
///
/// ```
/// use shared::delivery::{DeliveryFilter, StatusFilter};
/// use shared::models::DeliveryStatus;
///
/// let filter = DeliveryFilter::new()
///     .query("oak avenue")
///     .status(StatusFilter::Only(DeliveryStatus::Pending))
///     .delivery_boy("b1");
/// assert!(!filter.is_pass_through());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryFilter {
    needle: Needle,
    status: StatusFilter,
    delivery_boy_id: Option<String>,
    customer_id: Option<String>,
    range: Option<DateRange>,
}

impl DeliveryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: &str) -> Self {
        self.needle = Needle::new(query);
        self
    }

    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    /// Restrict to one delivery boy's own records
    pub fn delivery_boy(mut self, id: impl Into<String>) -> Self {
        self.delivery_boy_id = Some(id.into());
        self
    }

    /// Restrict to one customer's records
    pub fn customer(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(id.into());
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn is_pass_through(&self) -> bool {
        self.needle.is_empty()
            && self.status == StatusFilter::All
            && self.delivery_boy_id.is_none()
            && self.customer_id.is_none()
            && self.range.is_none()
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        if !self.status.matches(record.status) {
            return false;
        }
        if let Some(id) = &self.delivery_boy_id
            && record.delivery_boy_id != *id
        {
            return false;
        }
        if let Some(id) = &self.customer_id
            && record.customer_id != *id
        {
            return false;
        }
        if let Some(range) = &self.range
            && !range.contains(record.delivery_date)
        {
            return false;
        }
        self.needle.found_in_any([
            record.customer_name(),
            record.delivery_boy_name(),
            record.customer_address(),
        ])
    }

    pub fn apply<'a>(&self, records: &'a [DeliveryRecord]) -> Vec<&'a DeliveryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Order-preserving `(query, status)` filter over deliveries
pub fn filter_deliveries<'a>(
    records: &'a [DeliveryRecord],
    query: &str,
    status: StatusFilter,
) -> Vec<&'a DeliveryRecord> {
    DeliveryFilter::new().query(query).status(status).apply(records)
}

/// Order-preserving personnel search
pub fn filter_people<'a>(people: &'a [Person], query: &str) -> Vec<&'a Person> {
    people.iter().filter(|p| person_matches(p, query)).collect()
}

/// Order-preserving customer search
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|c| customer_matches(c, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::test_support::{dated, person, record, with_parties};
    use chrono::NaiveDate;

    fn sample() -> Vec<DeliveryRecord> {
        vec![
            with_parties(
                record("1", DeliveryStatus::Pending, 2.0),
                "John Smith",
                "123 Main St, City",
                "Ravi Kumar",
            ),
            with_parties(
                record("2", DeliveryStatus::Delivered, 1.0),
                "Sarah Johnson",
                "456 Oak Avenue, Downtown",
                "Ravi Kumar",
            ),
            with_parties(
                record("3", DeliveryStatus::Issue, 1.0),
                "Mike Wilson",
                "789 Pine Road",
                "Anil Singh",
            ),
        ]
    }

    fn ids(records: &[&DeliveryRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_and_all_returns_everything_in_order() {
        let records = sample();
        let out = filter_deliveries(&records, "", StatusFilter::All);
        assert_eq!(ids(&out), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let records = sample();
        assert_eq!(ids(&filter_deliveries(&records, "SMITH", StatusFilter::All)), vec!["1"]);
        assert_eq!(ids(&filter_deliveries(&records, "oak av", StatusFilter::All)), vec!["2"]);
        assert_eq!(ids(&filter_deliveries(&records, "ravi", StatusFilter::All)), vec!["1", "2"]);
        // substring, not prefix
        assert_eq!(ids(&filter_deliveries(&records, "ilson", StatusFilter::All)), vec!["3"]);
        assert!(filter_deliveries(&records, "smyth", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_status_and_text_are_anded() {
        let records = sample();
        let out = filter_deliveries(
            &records,
            "ravi",
            StatusFilter::Only(DeliveryStatus::Delivered),
        );
        assert_eq!(ids(&out), vec!["2"]);
    }

    #[test]
    fn test_missing_projection_never_matches_text() {
        let bare = record("9", DeliveryStatus::Pending, 1.0);
        assert!(text_matches(&bare, ""));
        assert!(!text_matches(&bare, "john"));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Issue".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(DeliveryStatus::Issue)
        );
        assert!("ALL".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::Only(DeliveryStatus::Pending).to_string(), "Pending");
    }

    #[test]
    fn test_status_filter_serde() {
        let f: StatusFilter = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(f, StatusFilter::Only(DeliveryStatus::Delivered));
        assert_eq!(serde_json::to_string(&StatusFilter::All).unwrap(), "\"all\"");
        assert!(serde_json::from_str::<StatusFilter>("\"done\"").is_err());
    }

    #[test]
    fn test_identity_filters() {
        let mut records = sample();
        records[2].delivery_boy_id = "b2".into();
        records[1].customer_id = "c2".into();

        let mine = DeliveryFilter::new().delivery_boy("b2").apply(&records);
        assert_eq!(ids(&mine), vec!["3"]);

        let theirs = DeliveryFilter::new().customer("c2").apply(&records);
        assert_eq!(ids(&theirs), vec!["2"]);
    }

    #[test]
    fn test_date_range_filter() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let records = vec![
            dated("1", DeliveryStatus::Pending, d(1)),
            dated("2", DeliveryStatus::Pending, d(5)),
            dated("3", DeliveryStatus::Pending, d(9)),
        ];
        let out = DeliveryFilter::new()
            .within(DateRange::new(d(2), d(9)))
            .apply(&records);
        assert_eq!(ids(&out), vec!["2", "3"]);
    }

    #[test]
    fn test_default_filter_is_pass_through() {
        assert!(DeliveryFilter::new().is_pass_through());
        assert!(DeliveryFilter::new().query("").is_pass_through());
        assert!(!DeliveryFilter::new().status(DeliveryStatus::Issue).is_pass_through());
    }

    #[test]
    fn test_person_search_fields() {
        let mut ravi = person("b1", "Ravi Kumar", "ravi_k");
        ravi.mobile = "9876543210".into();
        let anil = person("b2", "Anil Singh", "anil.s");
        let people = vec![ravi, anil];

        let names = |q: &str| -> Vec<String> {
            filter_people(&people, q).iter().map(|p| p.id.clone()).collect()
        };
        assert_eq!(names("KUMAR"), vec!["b1"]);
        assert_eq!(names("anil.s"), vec!["b2"]);
        assert_eq!(names("543"), vec!["b1"]);
        assert_eq!(names(""), vec!["b1", "b2"]);
    }

    #[test]
    fn test_customer_search_fields() {
        let customers = vec![
            Customer {
                id: "c1".into(),
                name: "John Smith".into(),
                address: "123 Main St".into(),
                mobile: "9876543210".into(),
                created_at: None,
            },
            Customer {
                id: "c2".into(),
                name: "Sarah Johnson".into(),
                address: "456 Oak Avenue".into(),
                mobile: "9123456789".into(),
                created_at: None,
            },
        ];
        let found: Vec<_> = filter_customers(&customers, "john")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(found, vec!["c1", "c2"]);
        assert_eq!(filter_customers(&customers, "oak")[0].id, "c2");
        assert_eq!(filter_customers(&customers, "91234")[0].id, "c2");
    }
}
