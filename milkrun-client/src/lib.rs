//! Milkrun Client - async side of the delivery engine
//!
//! HTTP transport to the delivery backend, the optimistic [`DeliveryBoard`]
//! and the customer/delivery boy [`Directory`].

pub mod backend;
pub mod board;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod logger;

pub use backend::DeliveryBackend;
pub use board::{BoardError, BoardEvent, BoardResult, DeliveryBoard};
pub use config::ClientConfig;
pub use directory::Directory;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse};
