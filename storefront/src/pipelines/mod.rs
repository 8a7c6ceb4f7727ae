// storefront/src/pipelines/mod.rs

//! Pipelines built on `storefront-core` and the context data they run over.

pub mod checkout_pipeline;
pub mod contexts;

pub use checkout_pipeline::build_checkout_pipeline;
pub use contexts::{CheckoutCtxData, CheckoutState};
