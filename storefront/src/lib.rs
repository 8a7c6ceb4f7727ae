// storefront/src/lib.rs

//! Storefront service: catalog browsing, a per-session cart, checkout into
//! orders, accounts and back-office operations, served as a JSON API.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
