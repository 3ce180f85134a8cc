// account-backend/src/domain/mod.rs
pub mod account_model;
pub mod customer_model;
pub mod subscription_status;
