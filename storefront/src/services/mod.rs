// storefront/src/services/mod.rs

pub mod admin_service;
pub mod auth_service;
pub mod checkout_service;
pub mod identity;
pub mod optimistic;
pub mod pricing;

pub use admin_service::AdminService;
pub use checkout_service::{CheckoutAssembler, CheckoutReceipt, CheckoutRejection, CheckoutRequest};
pub use identity::{AuthEvent, AuthEventKind, IdentityProvider, Session, SessionIdentity};
pub use optimistic::OptimisticList;
pub use pricing::{ShippingPolicy, Totals};
