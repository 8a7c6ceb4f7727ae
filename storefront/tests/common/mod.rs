// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use storefront::cart::CartHandle;
use storefront::config::AppConfig;
use storefront::models::{NewProduct, PaymentMethod, Product, ShippingAddress};
use storefront::services::{CheckoutAssembler, CheckoutRequest, ShippingPolicy};
use storefront::state::AppState;
use storefront::store::{DataStore, MemoryStore};
use tracing::Level;
use uuid::Uuid;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn new_product(id: &str, price: i64) -> NewProduct {
  NewProduct {
    id: Some(id.to_string()),
    name: format!("Product {}", id),
    code: format!("SKU-{}", id),
    description: Some(format!("Description of {}", id)),
    price: Decimal::from(price),
    image_url: Some(format!("/images/{}.jpg", id)),
    category_id: None,
    subcategory_id: None,
    is_active: true,
  }
}

/// Memory store holding products A (100), B (250) and C (600).
pub async fn seeded_store() -> Arc<MemoryStore> {
  let store = Arc::new(MemoryStore::new());
  for (id, price) in [("A", 100), ("B", 250), ("C", 600)] {
    store.create_product(new_product(id, price)).await.unwrap();
  }
  store
}

pub async fn product(store: &MemoryStore, id: &str) -> Product {
  store.get_product(id).await.unwrap().unwrap()
}

pub fn sample_address() -> ShippingAddress {
  ShippingAddress {
    full_name: "Asha Rao".to_string(),
    phone: "9800000000".to_string(),
    address_line1: "12 MG Road".to_string(),
    address_line2: Some("Flat 4".to_string()),
    city: "Pune".to_string(),
    state: "Maharashtra".to_string(),
    zip_code: "411001".to_string(),
    country: "India".to_string(),
  }
}

pub fn checkout_request(address: ShippingAddress) -> CheckoutRequest {
  CheckoutRequest {
    address,
    payment_method: PaymentMethod::Cod,
    checkout_token: Uuid::new_v4(),
    remember_address: false,
  }
}

pub fn assembler(store: Arc<MemoryStore>, timeout: Duration) -> CheckoutAssembler {
  let dyn_store: Arc<dyn DataStore> = store;
  CheckoutAssembler::new(dyn_store, ShippingPolicy::default(), timeout)
}

pub async fn cart_with(store: &MemoryStore, ids: &[&str]) -> CartHandle {
  let cart = CartHandle::new();
  for id in ids {
    cart.add_item(&product(store, id).await);
  }
  cart
}

pub fn test_config() -> AppConfig {
  AppConfig {
    bootstrap_admin_email: Some("admin@shop.test".to_string()),
    checkout_timeout: Duration::from_secs(2),
    ..AppConfig::default()
  }
}

pub fn app_state(store: Arc<MemoryStore>) -> AppState {
  let dyn_store: Arc<dyn DataStore> = store;
  AppState::new(Arc::new(test_config()), dyn_store)
}
