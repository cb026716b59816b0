//! Delivery engine
//!
//! Pure, synchronous logic over [`DeliveryRecord`](crate::models::DeliveryRecord)
//! collections:
//!
//! - [`lifecycle`]: the `Pending -> Delivered | Issue` state machine
//! - [`aggregate`]: summary folds, date windows, per delivery boy groups
//! - [`filter`]: search text and status predicates
//! - [`presenter`]: dashboard, roster and report metric sets
//!
//! Nothing here performs I/O; the client crate owns the working set and
//! calls into these functions.

pub mod aggregate;
pub mod filter;
pub mod lifecycle;
pub mod presenter;

pub use aggregate::{
    DateRange, DeliveryBoyStats, SummaryAggregate, aggregate, aggregate_by_delivery_boy,
    aggregate_in_range, same_month, success_rate, windowed_count,
};
pub use filter::{
    DeliveryFilter, StatusFilter, filter_customers, filter_deliveries, filter_people,
};
pub use lifecycle::{TransitionError, apply_transition, apply_transition_with_notes, can_transition};
pub use presenter::{
    AdminDashboard, CustomerHistoryStats, PersonalStats, RosterEntry, RosterTotals, StatusSlice,
    admin_dashboard, customer_history, daily_report, percent, personal_stats, recent_deliveries,
    roster, roster_totals,
};
