// src/config/mod.rs
pub mod stripe;

pub use stripe::{StripeConfig, PLAN_MONTHLY};
