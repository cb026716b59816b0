//! HTTP client for the delivery backend REST API

use crate::{ClientConfig, ClientError, ClientResult};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{LoginRequest, LoginResponse};
use shared::delivery::DateRange;
use shared::error::ErrorBody;
use shared::models::{
    Customer, CustomerCreate, CustomerReport, CustomerUpdate, DailyReport, DeliveryBoyReport,
    DeliveryCreate, DeliveryRecord, DeliverySummary, DeliveryUpdate, Person, StatusUpdate,
};
use std::time::Duration;

/// HTTP client for making network requests to the delivery backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Drop the token (client-side logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn authorized(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)).query(query));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let request = self.authorized(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Failures carry the backend's `{"error": "..."}` message when present,
    /// otherwise the raw body.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            tracing::debug!(status = %status, error = %message, "Backend request failed");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                    Err(ClientError::Validation(message))
                }
                _ => Err(ClientError::Internal(message)),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ========== Auth API ==========

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("auth/login", &request).await
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<Person> {
        self.get("auth/me").await
    }

    // ========== Delivery API ==========

    pub async fn deliveries(&self) -> ClientResult<Vec<DeliveryRecord>> {
        self.get("deliveries/").await
    }

    pub async fn daily_deliveries(&self, date: NaiveDate) -> ClientResult<Vec<DeliveryRecord>> {
        self.get(&format!("deliveries/daily/{date}")).await
    }

    pub async fn delivery_history(&self, customer_id: &str) -> ClientResult<Vec<DeliveryRecord>> {
        self.get(&format!("deliveries/history/{customer_id}")).await
    }

    pub async fn create_delivery(&self, create: &DeliveryCreate) -> ClientResult<DeliveryRecord> {
        self.post("deliveries/", create).await
    }

    pub async fn update_delivery(
        &self,
        id: &str,
        update: &DeliveryUpdate,
    ) -> ClientResult<DeliveryRecord> {
        self.put(&format!("deliveries/{id}"), update).await
    }

    pub async fn update_delivery_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> ClientResult<DeliveryRecord> {
        self.put(&format!("deliveries/{id}/status"), update).await
    }

    // ========== Customer API ==========

    pub async fn customers(&self) -> ClientResult<Vec<Customer>> {
        self.get("customers/").await
    }

    pub async fn create_customer(&self, create: &CustomerCreate) -> ClientResult<Customer> {
        self.post("customers/", create).await
    }

    pub async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> ClientResult<Customer> {
        self.put(&format!("customers/{id}"), update).await
    }

    pub async fn delete_customer(&self, id: &str) -> ClientResult<serde_json::Value> {
        self.delete(&format!("customers/{id}")).await
    }

    // ========== Personnel API ==========

    pub async fn delivery_boys(&self) -> ClientResult<Vec<Person>> {
        self.get("users/delivery-boys").await
    }

    // ========== Report API ==========

    /// Summary over all deliveries, or only those inside `range`
    pub async fn summary_report(&self, range: Option<DateRange>) -> ClientResult<DeliverySummary> {
        match range {
            Some(range) => {
                self.get_with_query("reports/summary", &range_query(&range))
                    .await
            }
            None => self.get("reports/summary").await,
        }
    }

    pub async fn customer_report(
        &self,
        customer_id: &str,
        range: Option<DateRange>,
    ) -> ClientResult<CustomerReport> {
        let path = format!("reports/customer/{customer_id}");
        match range {
            Some(range) => self.get_with_query(&path, &range_query(&range)).await,
            None => self.get(&path).await,
        }
    }

    pub async fn delivery_boy_report(
        &self,
        delivery_boy_id: &str,
        range: Option<DateRange>,
    ) -> ClientResult<DeliveryBoyReport> {
        let path = format!("reports/delivery-boy/{delivery_boy_id}");
        match range {
            Some(range) => self.get_with_query(&path, &range_query(&range)).await,
            None => self.get(&path).await,
        }
    }

    pub async fn daily_report(&self, date: NaiveDate) -> ClientResult<DailyReport> {
        self.get(&format!("reports/daily/{date}")).await
    }
}

fn range_query(range: &DateRange) -> [(&'static str, String); 2] {
    [
        ("start_date", range.start.to_string()),
        ("end_date", range.end.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://host/api/")).unwrap();
        assert_eq!(client.url("/deliveries/"), "http://host/api/deliveries/");
        assert_eq!(client.url("reports/daily/2024-06-09"), "http://host/api/reports/daily/2024-06-09");
    }

    #[test]
    fn test_token_handling() {
        let mut client = HttpClient::new(&ClientConfig::default())
            .unwrap()
            .with_token("abc");
        assert_eq!(client.token(), Some("abc"));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer abc"));
        client.clear_token();
        assert!(client.auth_header().is_none());
    }

    #[test]
    fn test_range_query() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 7).unwrap(),
        );
        let q = range_query(&range);
        assert_eq!(q[0], ("start_date", "2024-06-01".to_string()));
        assert_eq!(q[1], ("end_date", "2024-06-07".to_string()));
    }
}
