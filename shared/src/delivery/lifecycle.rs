//! Delivery status lifecycle
//!
//! ```text
//! Pending ──► Delivered
//!    │
//!    └──────► Issue
//! ```
//!
//! `Delivered` and `Issue` are terminal. Admin edits bypass this machine
//! entirely (see [`DeliveryUpdate`](crate::models::DeliveryUpdate)).

use crate::error::{AppError, ErrorCode};
use crate::models::{DeliveryRecord, DeliveryStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid transition for delivery {id}: {from} -> {to}")]
pub struct TransitionError {
    pub id: String,
    pub from: DeliveryStatus,
    pub to: DeliveryStatus,
}

impl TransitionError {
    pub fn code(&self) -> ErrorCode {
        if self.from.is_terminal() {
            ErrorCode::DeliveryAlreadyFinal
        } else {
            ErrorCode::InvalidTransition
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::with_message(err.code(), err.to_string())
            .with_detail("delivery_id", err.id)
            .with_detail("from", err.from.as_str())
            .with_detail("to", err.to.as_str())
    }
}

/// True iff `record` is `Pending` and `target` is `Delivered` or `Issue`
pub fn can_transition(record: &DeliveryRecord, target: DeliveryStatus) -> bool {
    record.status == DeliveryStatus::Pending && target.is_terminal()
}

/// Apply a lifecycle transition without touching the input.
///
/// Only `status` and `timestamp` change; quantity, references and
/// projections are carried over unchanged.
pub fn apply_transition(
    record: &DeliveryRecord,
    target: DeliveryStatus,
    now: DateTime<Utc>,
) -> Result<DeliveryRecord, TransitionError> {
    if !can_transition(record, target) {
        return Err(TransitionError {
            id: record.id.clone(),
            from: record.status,
            to: target,
        });
    }
    Ok(DeliveryRecord {
        status: target,
        timestamp: now,
        ..record.clone()
    })
}

/// [`apply_transition`] plus a notes change, as the delivery-boy flow allows
pub fn apply_transition_with_notes(
    record: &DeliveryRecord,
    target: DeliveryStatus,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DeliveryRecord, TransitionError> {
    let mut next = apply_transition(record, target, now)?;
    if let Some(notes) = notes {
        next.notes = notes.to_string();
    }
    Ok(next)
}
