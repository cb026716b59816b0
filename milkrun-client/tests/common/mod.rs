// Scripted in-memory backend for board and directory tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use milkrun_client::{ClientError, ClientResult, DeliveryBackend};
use parking_lot::Mutex;
use serde_json::json;
use shared::models::{
    Customer, DeliveryCreate, DeliveryRecord, DeliveryStatus, DeliveryUpdate, Person, StatusUpdate,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Semaphore, mpsc};

pub fn server_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 9, 7, 15, 0).unwrap()
}

pub fn delivery(id: &str, status: &str, boy: &str, customer: &str) -> DeliveryRecord {
    serde_json::from_value(json!({
        "id": id,
        "customer_id": customer,
        "delivery_boy_id": boy,
        "delivery_date": "2024-06-09",
        "quantity": 2.0,
        "status": status,
        "timestamp": "2024-06-09T05:00:00",
        "notes": "",
        "customer": {"name": format!("Customer {customer}"), "address": "12 Dairy Lane"},
        "delivery_boy": {"name": format!("Boy {boy}")}
    }))
    .unwrap()
}

pub fn delivery_boy(id: &str, name: &str) -> Person {
    serde_json::from_value(json!({
        "id": id,
        "username": name.to_lowercase().replace(' ', "_"),
        "name": name,
        "role": "delivery_boy",
        "mobile": "9876543210"
    }))
    .unwrap()
}

pub fn customer(id: &str, name: &str) -> Customer {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "address": "12 Dairy Lane",
        "mobile": "5550100"
    }))
    .unwrap()
}

/// Behaves like the REST backend, with switches for failures and a gate that
/// holds status updates until the test releases them.
pub struct ScriptedBackend {
    pub remote: Mutex<Vec<DeliveryRecord>>,
    pub customers: Mutex<Vec<Customer>>,
    pub delivery_boys: Mutex<Vec<Person>>,
    pub fail_updates: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_creates: AtomicBool,
    pub fail_directory: AtomicBool,
    pub status_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    gated: AtomicBool,
    entered: Mutex<Option<mpsc::UnboundedSender<String>>>,
    release: Semaphore,
}

impl ScriptedBackend {
    pub fn new(records: Vec<DeliveryRecord>) -> Self {
        Self {
            remote: Mutex::new(records),
            customers: Mutex::new(Vec::new()),
            delivery_boys: Mutex::new(Vec::new()),
            fail_updates: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            fail_creates: AtomicBool::new(false),
            fail_directory: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            gated: AtomicBool::new(false),
            entered: Mutex::new(None),
            release: Semaphore::new(0),
        }
    }

    /// Status updates block until [`release`](Self::release); the receiver
    /// yields each id as its call arrives.
    pub fn gated(records: Vec<DeliveryRecord>) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Self::new(records);
        backend.gated.store(true, Ordering::SeqCst);
        *backend.entered.lock() = Some(tx);
        (backend, rx)
    }

    pub fn release(&self, n: usize) {
        self.release.add_permits(n);
    }

    pub fn remote_status(&self, id: &str) -> Option<DeliveryStatus> {
        self.remote.lock().iter().find(|r| r.id == id).map(|r| r.status)
    }
}

#[async_trait]
impl DeliveryBackend for ScriptedBackend {
    async fn list_deliveries(&self) -> ClientResult<Vec<DeliveryRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("database unavailable".into()));
        }
        Ok(self.remote.lock().clone())
    }

    async fn update_delivery_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> ClientResult<DeliveryRecord> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated.load(Ordering::SeqCst) {
            if let Some(tx) = self.entered.lock().as_ref() {
                let _ = tx.send(id.to_string());
            }
            if let Ok(permit) = self.release.acquire().await {
                permit.forget();
            }
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ClientError::Validation("Delivery is already completed".into()));
        }

        let mut remote = self.remote.lock();
        let record = remote
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound("Delivery not found".into()))?;
        record.status = update.status;
        record.timestamp = server_time();
        record.updated_by = Some(record.delivery_boy_id.clone());
        if let Some(notes) = &update.notes {
            record.notes = notes.clone();
        }

        // status endpoint answers without the joined projections
        Ok(DeliveryRecord {
            customer: None,
            delivery_boy: None,
            ..record.clone()
        })
    }

    async fn update_delivery(
        &self,
        id: &str,
        update: &DeliveryUpdate,
    ) -> ClientResult<DeliveryRecord> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("write failed".into()));
        }
        let mut remote = self.remote.lock();
        let record = remote
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound("Delivery not found".into()))?;
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(quantity) = update.quantity {
            record.quantity = quantity;
        }
        if let Some(notes) = &update.notes {
            record.notes = notes.clone();
        }
        if let Some(date) = update.delivery_date {
            record.delivery_date = date;
        }
        record.timestamp = server_time();
        Ok(record.clone())
    }

    async fn create_delivery(&self, create: &DeliveryCreate) -> ClientResult<DeliveryRecord> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(ClientError::Validation("Customer not found".into()));
        }
        let mut remote = self.remote.lock();
        let mut record = delivery(
            &format!("new-{}", remote.len() + 1),
            "Pending",
            &create.delivery_boy_id,
            &create.customer_id,
        );
        record.delivery_date = create.delivery_date;
        record.quantity = create.quantity;
        record.notes = create.notes.clone().unwrap_or_default();
        remote.push(record.clone());
        Ok(record)
    }

    async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        if self.fail_directory.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.customers.lock().clone())
    }

    async fn list_delivery_boys(&self) -> ClientResult<Vec<Person>> {
        if self.fail_directory.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthorized);
        }
        Ok(self.delivery_boys.lock().clone())
    }
}
