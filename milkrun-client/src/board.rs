//! Delivery board - the client's working set of deliveries
//!
//! The board owns the local copy of every delivery and is the only thing that
//! mutates it. Lifecycle transitions are applied optimistically:
//!
//! 1. validate against the lifecycle (no remote call on failure)
//! 2. write the new status into the working set and emit [`BoardEvent::Optimistic`]
//! 3. send the status update to the backend
//! 4. on success adopt the backend's copy; on failure reload everything
//!
//! A record id with an update in flight is busy; a second attempt on it is
//! rejected with [`BoardError::Busy`] until the first one returns.
//!
//! Locks are never held across an `.await`.

use crate::{ClientError, DeliveryBackend, Directory};
use chrono::{NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use shared::delivery::{
    self, AdminDashboard, CustomerHistoryStats, DeliveryFilter, PersonalStats, SummaryAggregate,
    TransitionError, apply_transition_with_notes,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DailyReport, DeliveryCreate, DeliveryRecord, DeliveryStatus, DeliveryUpdate, StatusUpdate,
};
use shared::util::now_millis;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Board error taxonomy
#[derive(Debug, Error)]
pub enum BoardError {
    /// Rejected by the lifecycle; nothing was changed or sent
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Another update for this id is still in flight
    #[error("Delivery {0} is already being updated")]
    Busy(String),

    /// The backend rejected the write; the board has been reloaded
    #[error("Failed to update delivery {id}: {source}")]
    RemoteUpdate {
        id: String,
        #[source]
        source: ClientError,
    },

    /// The backend refused to create the delivery; nothing was stored
    #[error("Failed to create delivery: {source}")]
    RemoteCreate {
        #[source]
        source: ClientError,
    },

    /// Reload failed; local state may be stale
    #[error("Failed to load deliveries: {0}")]
    RemoteRead(#[source] ClientError),

    #[error("Delivery not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(AppError),
}

impl BoardError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTransition(e) => e.code(),
            Self::Busy(_) => ErrorCode::DeliveryBusy,
            Self::RemoteUpdate { .. } => ErrorCode::RemoteUpdateFailed,
            Self::RemoteRead(_) => ErrorCode::RemoteReadFailed,
            Self::RemoteCreate { .. } => ErrorCode::RemoteCreateFailed,
            Self::NotFound(_) => ErrorCode::DeliveryNotFound,
            Self::Validation(e) => e.code,
        }
    }

    /// Local errors leave the working set untouched and need no round trip
    pub fn is_local(&self) -> bool {
        self.code().category().is_local()
    }
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            BoardError::InvalidTransition(e) => e.into(),
            BoardError::Validation(e) => e,
            BoardError::Busy(id) | BoardError::NotFound(id) => {
                AppError::with_message(code, message).with_detail("delivery_id", id)
            }
            _ => AppError::with_message(code, message),
        }
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Working set change notifications
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Working set replaced by a full reload
    Reloaded { count: usize },
    /// Status written locally, remote call pending
    Optimistic { id: String, status: DeliveryStatus },
    /// Backend accepted the write; carries the reconciled record
    Confirmed { record: DeliveryRecord },
    /// Backend rejected the write and the board was reloaded
    RolledBack { id: String },
}

/// Marks an id busy for as long as it lives
struct BusyGuard<'a> {
    busy: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> BusyGuard<'a> {
    fn acquire(busy: &'a Mutex<HashSet<String>>, id: &str) -> BoardResult<Self> {
        if !busy.lock().insert(id.to_string()) {
            return Err(BoardError::Busy(id.to_string()));
        }
        Ok(Self {
            busy,
            id: id.to_string(),
        })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.lock().remove(&self.id);
    }
}

/// Optimistic working set over a [`DeliveryBackend`]
pub struct DeliveryBoard<B: DeliveryBackend> {
    backend: Arc<B>,
    records: RwLock<Vec<DeliveryRecord>>,
    busy: Mutex<HashSet<String>>,
    event_tx: broadcast::Sender<BoardEvent>,
    last_synced_at: RwLock<Option<i64>>,
}

impl<B: DeliveryBackend> std::fmt::Debug for DeliveryBoard<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryBoard")
            .field("records", &self.records.read().len())
            .field("busy", &self.busy.lock().len())
            .field("event_tx", &"<broadcast::Sender>")
            .field("last_synced_at", &*self.last_synced_at.read())
            .finish()
    }
}

impl<B: DeliveryBackend> DeliveryBoard<B> {
    /// Create an empty board; call [`reload`](Self::reload) to populate it
    pub fn new(backend: Arc<B>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            records: RwLock::new(Vec::new()),
            busy: Mutex::new(HashSet::new()),
            event_tx,
            last_synced_at: RwLock::new(None),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Subscribe to working set changes
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: BoardEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Board event dropped: no subscribers");
        }
    }

    // ========== Commands ==========

    /// Replace the working set with the backend's full list
    pub async fn reload(&self) -> BoardResult<usize> {
        let fresh = self.backend.list_deliveries().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to reload deliveries");
            BoardError::RemoteRead(e)
        })?;

        let count = fresh.len();
        *self.records.write() = fresh;
        *self.last_synced_at.write() = Some(now_millis());
        tracing::info!(count, "Deliveries reloaded");
        self.emit(BoardEvent::Reloaded { count });
        Ok(count)
    }

    /// Move a pending delivery to `target`, optimistically
    ///
    /// Returns the record as reconciled with the backend.
    pub async fn transition(
        &self,
        id: &str,
        target: DeliveryStatus,
        notes: Option<&str>,
    ) -> BoardResult<DeliveryRecord> {
        let _guard = BusyGuard::acquire(&self.busy, id)?;

        let optimistic = {
            let mut records = self.records.write();
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
            let next = apply_transition_with_notes(slot, target, notes, Utc::now())?;
            *slot = next.clone();
            next
        };
        tracing::debug!(delivery_id = %id, status = %target, "Applied optimistic status");
        self.emit(BoardEvent::Optimistic {
            id: id.to_string(),
            status: target,
        });

        let update = StatusUpdate {
            status: target,
            notes: notes.map(str::to_string),
        };
        match self.backend.update_delivery_status(id, &update).await {
            Ok(canonical) => {
                let record = self.reconcile(optimistic, canonical);
                self.emit(BoardEvent::Confirmed {
                    record: record.clone(),
                });
                Ok(record)
            }
            Err(source) => {
                tracing::warn!(delivery_id = %id, error = %source, "Status update rejected, reloading");
                if let Err(read_err) = self.reload().await {
                    tracing::error!(delivery_id = %id, error = %source, "Rollback reload failed after rejected update");
                    return Err(read_err);
                }
                self.emit(BoardEvent::RolledBack { id: id.to_string() });
                Err(BoardError::RemoteUpdate {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Adopt the backend's copy of a record. Projections the backend left
    /// out are kept from the local copy.
    fn reconcile(&self, optimistic: DeliveryRecord, mut canonical: DeliveryRecord) -> DeliveryRecord {
        if canonical.id != optimistic.id {
            tracing::warn!(
                delivery_id = %optimistic.id,
                returned_id = %canonical.id,
                "Backend returned a different record, keeping local copy"
            );
            return optimistic;
        }
        if canonical.customer.is_none() {
            canonical.customer = optimistic.customer;
        }
        if canonical.delivery_boy.is_none() {
            canonical.delivery_boy = optimistic.delivery_boy;
        }

        let mut records = self.records.write();
        if let Some(slot) = records.iter_mut().find(|r| r.id == canonical.id) {
            *slot = canonical.clone();
        }
        canonical
    }

    pub async fn mark_delivered(&self, id: &str) -> BoardResult<DeliveryRecord> {
        self.transition(id, DeliveryStatus::Delivered, None).await
    }

    pub async fn report_issue(&self, id: &str, notes: &str) -> BoardResult<DeliveryRecord> {
        self.transition(id, DeliveryStatus::Issue, Some(notes)).await
    }

    /// Admin edit: any field, any status. Not optimistic; the board is
    /// reloaded after the backend accepts it. Once accepted the record is
    /// returned even if that reload fails.
    pub async fn admin_update(
        &self,
        id: &str,
        update: &DeliveryUpdate,
    ) -> BoardResult<DeliveryRecord> {
        if update.is_empty() {
            return Err(BoardError::Validation(AppError::validation(
                "No changes to save",
            )));
        }
        update.validate().map_err(BoardError::Validation)?;
        let _guard = BusyGuard::acquire(&self.busy, id)?;

        let record = self
            .backend
            .update_delivery(id, update)
            .await
            .map_err(|source| {
                tracing::warn!(delivery_id = %id, error = %source, "Admin update rejected");
                BoardError::RemoteUpdate {
                    id: id.to_string(),
                    source,
                }
            })?;
        tracing::info!(delivery_id = %id, "Delivery updated by admin");
        Ok(self.settle_accepted(record).await)
    }

    /// Admin create; the new record starts `Pending`
    pub async fn admin_create(&self, create: &DeliveryCreate) -> BoardResult<DeliveryRecord> {
        create.validate().map_err(BoardError::Validation)?;

        let record = self
            .backend
            .create_delivery(create)
            .await
            .map_err(|source| {
                tracing::warn!(customer_id = %create.customer_id, error = %source, "Delivery creation rejected");
                BoardError::RemoteCreate { source }
            })?;
        tracing::info!(delivery_id = %record.id, customer_id = %record.customer_id, "Delivery created");
        Ok(self.settle_accepted(record).await)
    }

    /// Reload after an accepted admin write. If the reload fails the accepted
    /// record is merged into the working set and `last_synced_at` is left at
    /// the previous sync.
    async fn settle_accepted(&self, mut record: DeliveryRecord) -> DeliveryRecord {
        let read_err = match self.reload().await {
            Ok(_) => return record,
            Err(e) => e,
        };
        tracing::warn!(
            delivery_id = %record.id,
            error = %read_err,
            "Reload after accepted write failed, working set is stale"
        );

        {
            let mut records = self.records.write();
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(slot) => {
                    if record.customer.is_none() {
                        record.customer = slot.customer.take();
                    }
                    if record.delivery_boy.is_none() {
                        record.delivery_boy = slot.delivery_boy.take();
                    }
                    *slot = record.clone();
                }
                None => records.push(record.clone()),
            }
        }
        self.emit(BoardEvent::Confirmed {
            record: record.clone(),
        });
        record
    }

    // ========== Reads ==========

    /// Snapshot of the working set, in backend order
    pub fn records(&self) -> Vec<DeliveryRecord> {
        self.records.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<DeliveryRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.lock().contains(id)
    }

    /// Millis of the last successful reload
    pub fn last_synced_at(&self) -> Option<i64> {
        *self.last_synced_at.read()
    }

    pub fn filtered(&self, filter: &DeliveryFilter) -> Vec<DeliveryRecord> {
        filter
            .apply(&self.records.read())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> SummaryAggregate {
        delivery::aggregate(self.records.read().iter())
    }

    pub fn admin_dashboard(&self) -> AdminDashboard {
        delivery::admin_dashboard(&self.records.read())
    }

    pub fn personal_stats(&self, delivery_boy_id: &str) -> PersonalStats {
        delivery::personal_stats(&self.records.read(), delivery_boy_id)
    }

    pub fn customer_history(&self, customer_id: &str, today: NaiveDate) -> CustomerHistoryStats {
        delivery::customer_history(&self.records.read(), customer_id, today)
    }

    pub fn recent(&self, n: usize) -> Vec<DeliveryRecord> {
        delivery::recent_deliveries(&self.records.read(), n)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Daily report from the working set, naming delivery boys via `directory`
    pub fn daily_report(&self, date: NaiveDate, directory: &Directory<B>) -> DailyReport {
        delivery::daily_report(&self.records.read(), date, |id| directory.delivery_boy(id))
    }
}
