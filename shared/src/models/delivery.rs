//! Delivery Model (每日配送记录)

use crate::error::{AppError, AppResult, ErrorCode};
use crate::util::utc_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery status
///
/// Unknown status strings are a deserialization error, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Issue,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 3] = [Self::Pending, Self::Delivered, Self::Issue];

    /// Wire / display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
            Self::Issue => "Issue",
        }
    }

    /// `Delivered` and `Issue` have no outbound lifecycle transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Delivered" => Ok(Self::Delivered),
            "Issue" => Ok(Self::Issue),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Unknown delivery status: {}", other),
            )
            .with_detail("status", other)),
        }
    }
}

/// Customer projection attached to a delivery by the backend (read-only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mobile: String,
}

/// Delivery boy projection attached to a delivery by the backend (read-only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub mobile: String,
}

/// Delivery record - one scheduled drop of milk to one customer on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Assigned by the backend at creation, stable for the record's lifetime
    pub id: String,
    pub customer_id: String,
    pub delivery_boy_id: String,
    /// Scheduled date (YYYY-MM-DD)
    pub delivery_date: NaiveDate,
    /// Liters, always > 0
    pub quantity: f64,
    pub status: DeliveryStatus,
    /// Last status change
    #[serde(with = "utc_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_proof_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(
        default,
        with = "utc_timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    // -- Projections (populated by the backend, never mutated here) --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_boy: Option<PersonRef>,
}

impl DeliveryRecord {
    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.name.as_str())
    }

    pub fn customer_address(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.address.as_str())
    }

    pub fn delivery_boy_name(&self) -> Option<&str> {
        self.delivery_boy.as_ref().map(|p| p.name.as_str())
    }
}

/// Create delivery payload (admin). Status always starts `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryCreate {
    pub customer_id: String,
    pub delivery_boy_id: String,
    pub delivery_date: NaiveDate,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryCreate {
    pub fn validate(&self) -> AppResult<()> {
        if self.customer_id.trim().is_empty() {
            return Err(AppError::required("customer_id"));
        }
        if self.delivery_boy_id.trim().is_empty() {
            return Err(AppError::required("delivery_boy_id"));
        }
        validate_quantity(self.quantity)
    }
}

/// Update delivery payload (admin edit).
///
/// Unconstrained by the status lifecycle: any field may change, including a
/// terminal status going back to `Pending`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_boy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(id) = &self.customer_id
            && id.trim().is_empty()
        {
            return Err(AppError::required("customer_id"));
        }
        if let Some(id) = &self.delivery_boy_id
            && id.trim().is_empty()
        {
            return Err(AppError::required("delivery_boy_id"));
        }
        match self.quantity {
            Some(q) => validate_quantity(q),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.delivery_boy_id.is_none()
            && self.delivery_date.is_none()
            && self.quantity.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Status update payload (`PUT /deliveries/{id}/status`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_quantity(quantity: f64) -> AppResult<()> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("field", "quantity"))
    }
}
