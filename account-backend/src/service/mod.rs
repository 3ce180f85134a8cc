// src/service/mod.rs
pub mod account_service;
pub mod billing_provider;
pub mod stripe_provider;
