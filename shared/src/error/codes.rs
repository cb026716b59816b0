//! Unified error codes for Milkrun
//!
//! Codes are shared between the client library and whatever renders notices
//! to the operator. They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Delivery errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize
/// compactly and can be compared across language boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 4xxx: Delivery ====================
    /// Delivery record not found
    DeliveryNotFound = 4001,
    /// Status change not allowed from the current status
    InvalidTransition = 4002,
    /// Another status change on the same record is still in flight
    DeliveryBusy = 4003,
    /// Quantity must be greater than zero
    InvalidQuantity = 4004,
    /// Delivery already reached a terminal status
    DeliveryAlreadyFinal = 4005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network or transport failure
    NetworkError = 9002,
    /// Remote write failed, local state was reloaded
    RemoteUpdateFailed = 9003,
    /// Remote read failed, local state may be stale
    RemoteReadFailed = 9004,
    /// Remote create failed, nothing was stored
    RemoteCreateFailed = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Unknown => "An unknown error occurred",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token has expired",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin access required",

            Self::DeliveryNotFound => "Delivery not found",
            Self::InvalidTransition => "Delivery status cannot change from its current status",
            Self::DeliveryBusy => "Delivery is already being updated",
            Self::InvalidQuantity => "Quantity must be greater than zero",
            Self::DeliveryAlreadyFinal => "Delivery is already delivered or flagged",

            Self::InternalError => "Internal error",
            Self::NetworkError => "Network error",
            Self::RemoteUpdateFailed => "Failed to update delivery status",
            Self::RemoteReadFailed => "Failed to load deliveries",
            Self::RemoteCreateFailed => "Failed to create delivery",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::InvalidFormat),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),

            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::AdminRequired),

            4001 => Ok(Self::DeliveryNotFound),
            4002 => Ok(Self::InvalidTransition),
            4003 => Ok(Self::DeliveryBusy),
            4004 => Ok(Self::InvalidQuantity),
            4005 => Ok(Self::DeliveryAlreadyFinal),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::NetworkError),
            9003 => Ok(Self::RemoteUpdateFailed),
            9004 => Ok(Self::RemoteReadFailed),
            9005 => Ok(Self::RemoteCreateFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
