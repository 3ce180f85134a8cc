// src/lib.rs
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use domain::account_model::Account;
pub use error::{AppError, AppResult};
pub use repository::{MemoryStorage, Storable, Storage};
pub use service::billing_provider::BillingProvider;
