//! Shared types for Milkrun
//!
//! Wire models, the unified error system and the pure delivery engine used
//! by the client crate.

pub mod client;
pub mod delivery;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{DeliveryRecord, DeliveryStatus};
