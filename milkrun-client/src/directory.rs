//! Customers and delivery boys known to the client

use crate::DeliveryBackend;
use crate::board::{BoardError, BoardResult};
use parking_lot::RwLock;
use shared::delivery::{self, RosterEntry, RosterTotals};
use shared::models::{Customer, DeliveryRecord, Person};
use std::sync::Arc;

/// Read-only directory of customers and delivery boys
pub struct Directory<B: DeliveryBackend> {
    backend: Arc<B>,
    customers: RwLock<Vec<Customer>>,
    delivery_boys: RwLock<Vec<Person>>,
}

impl<B: DeliveryBackend> std::fmt::Debug for Directory<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("customers", &self.customers.read().len())
            .field("delivery_boys", &self.delivery_boys.read().len())
            .finish()
    }
}

impl<B: DeliveryBackend> Directory<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            customers: RwLock::new(Vec::new()),
            delivery_boys: RwLock::new(Vec::new()),
        }
    }

    /// Fetch both lists. On failure the previous contents stay in place.
    pub async fn refresh(&self) -> BoardResult<()> {
        let (customers, delivery_boys) = futures::try_join!(
            self.backend.list_customers(),
            self.backend.list_delivery_boys()
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to refresh directory");
            BoardError::RemoteRead(e)
        })?;

        tracing::info!(
            customers = customers.len(),
            delivery_boys = delivery_boys.len(),
            "Directory refreshed"
        );
        *self.customers.write() = customers;
        *self.delivery_boys.write() = delivery_boys;
        Ok(())
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.customers.read().clone()
    }

    pub fn delivery_boys(&self) -> Vec<Person> {
        self.delivery_boys.read().clone()
    }

    pub fn customer(&self, id: &str) -> Option<Customer> {
        self.customers.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn delivery_boy(&self, id: &str) -> Option<Person> {
        self.delivery_boys.read().iter().find(|p| p.id == id).cloned()
    }

    pub fn search_customers(&self, query: &str) -> Vec<Customer> {
        delivery::filter_customers(&self.customers.read(), query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_delivery_boys(&self, query: &str) -> Vec<Person> {
        delivery::filter_people(&self.delivery_boys.read(), query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Roster rows for every known delivery boy
    pub fn roster(&self, records: &[DeliveryRecord]) -> Vec<RosterEntry> {
        delivery::roster(&self.delivery_boys.read(), records)
    }

    pub fn roster_totals(&self, records: &[DeliveryRecord]) -> RosterTotals {
        delivery::roster_totals(&self.roster(records))
    }
}
