//! Data models
//!
//! Wire shapes exchanged with the delivery backend. Field names follow the
//! backend's snake_case JSON. All IDs are opaque strings assigned remotely.

pub mod customer;
pub mod delivery;
pub mod person;
pub mod report;

// Re-exports
pub use customer::*;
pub use delivery::*;
pub use person::*;
pub use report::*;
