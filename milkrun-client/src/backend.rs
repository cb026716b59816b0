//! Remote collaborator seen by the board and directory

use crate::{ClientResult, HttpClient};
use async_trait::async_trait;
use shared::models::{
    Customer, DeliveryCreate, DeliveryRecord, DeliveryUpdate, Person, StatusUpdate,
};

/// Authoritative store for deliveries and the people around them.
///
/// Failures come back as [`ClientError`](crate::ClientError) carrying the
/// backend's message.
#[async_trait]
pub trait DeliveryBackend: Send + Sync {
    async fn list_deliveries(&self) -> ClientResult<Vec<DeliveryRecord>>;

    /// Lifecycle write; returns the backend's copy of the record
    async fn update_delivery_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> ClientResult<DeliveryRecord>;

    /// Admin edit, unconstrained by the lifecycle
    async fn update_delivery(
        &self,
        id: &str,
        update: &DeliveryUpdate,
    ) -> ClientResult<DeliveryRecord>;

    async fn create_delivery(&self, create: &DeliveryCreate) -> ClientResult<DeliveryRecord>;

    async fn list_customers(&self) -> ClientResult<Vec<Customer>>;

    async fn list_delivery_boys(&self) -> ClientResult<Vec<Person>>;
}

#[async_trait]
impl DeliveryBackend for HttpClient {
    async fn list_deliveries(&self) -> ClientResult<Vec<DeliveryRecord>> {
        self.deliveries().await
    }

    async fn update_delivery_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> ClientResult<DeliveryRecord> {
        HttpClient::update_delivery_status(self, id, update).await
    }

    async fn update_delivery(
        &self,
        id: &str,
        update: &DeliveryUpdate,
    ) -> ClientResult<DeliveryRecord> {
        HttpClient::update_delivery(self, id, update).await
    }

    async fn create_delivery(&self, create: &DeliveryCreate) -> ClientResult<DeliveryRecord> {
        HttpClient::create_delivery(self, create).await
    }

    async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        self.customers().await
    }

    async fn list_delivery_boys(&self) -> ClientResult<Vec<Person>> {
        self.delivery_boys().await
    }
}
