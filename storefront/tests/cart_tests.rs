// tests/cart_tests.rs
mod common;

use common::*;
use rust_decimal::Decimal;
use storefront::cart::{CartHandle, CartRegistry};
use storefront::services::{ShippingPolicy, Totals};
use uuid::Uuid;

#[tokio::test]
async fn test_two_units_of_a_priced_at_100() {
  setup_tracing();
  let store = seeded_store().await;
  let cart = cart_with(&store, &["A", "A"]).await;

  assert_eq!(cart.lines().len(), 1);
  assert_eq!(cart.line("A").map(|l| l.quantity), Some(2));

  let totals = Totals::for_cart(&cart.snapshot(), &ShippingPolicy::default());
  assert_eq!(totals.subtotal, Decimal::from(200));
  assert_eq!(totals.shipping_fee, Decimal::from(50));
  assert_eq!(totals.total, Decimal::from(250));

  cart.add_item(&product(&store, "A").await);
  assert_eq!(cart.lines().len(), 1);
  assert_eq!(cart.line("A").map(|l| l.quantity), Some(3));
  assert_eq!(cart.total(), Decimal::from(300));
}

#[tokio::test]
async fn test_total_follows_every_edit() {
  setup_tracing();
  let store = seeded_store().await;
  let cart = cart_with(&store, &["A", "B", "C"]).await;
  assert_eq!(cart.total(), Decimal::from(950));

  cart.set_quantity("B", 3);
  assert_eq!(cart.total(), Decimal::from(1450));

  cart.remove_item("C");
  assert_eq!(cart.total(), Decimal::from(850));

  cart.set_quantity("A", 0);
  assert_eq!(cart.line("A").map(|l| l.quantity), Some(1));
  assert_eq!(cart.item_count(), 4);

  let ids: Vec<String> = cart.lines().into_iter().map(|l| l.product_id).collect();
  assert_eq!(ids, vec!["A", "B"]);

  cart.clear();
  assert!(cart.is_empty());
  assert_eq!(cart.total(), Decimal::ZERO);
}

#[tokio::test]
async fn test_cart_line_keeps_price_seen_when_added() {
  setup_tracing();
  let store = seeded_store().await;
  let mut a = product(&store, "A").await;
  let cart = CartHandle::new();
  cart.add_item(&a);

  a.price = Decimal::from(999);
  cart.add_item(&a);
  let line = cart.line("A").unwrap();
  assert_eq!(line.unit_price, Decimal::from(100));
  assert_eq!(line.image_ref.as_deref(), Some("/images/A.jpg"));
}

#[test]
fn test_handles_share_one_cart() {
  let cart = CartHandle::new();
  let other = cart.clone();
  other.open_drawer();
  assert!(cart.read().drawer_open());
  cart.close_drawer();
  assert!(!other.read().drawer_open());
}

#[tokio::test]
async fn test_registry_keeps_sessions_apart() {
  setup_tracing();
  let store = seeded_store().await;
  let registry = CartRegistry::new();
  let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

  registry.handle(alice).add_item(&product(&store, "A").await);
  registry.handle(bob).add_item(&product(&store, "B").await);
  registry.handle(alice).add_item(&product(&store, "A").await);

  assert_eq!(registry.len(), 2);
  assert_eq!(registry.handle(alice).item_count(), 2);
  assert_eq!(registry.handle(bob).total(), Decimal::from(250));
  assert!(registry.get(Uuid::new_v4()).is_none());

  assert!(registry.discard(bob));
  assert!(registry.get(bob).is_none());
  assert_eq!(registry.handle(bob).item_count(), 0);
}

#[test]
fn test_idle_carts_are_dropped_when_a_new_session_arrives() {
  let registry = CartRegistry::with_idle_timeout(std::time::Duration::from_millis(20));
  let (stale, fresh) = (Uuid::new_v4(), Uuid::new_v4());
  registry.handle(stale);
  assert!(registry.get(Uuid::new_v4()).is_none());
  assert_eq!(registry.len(), 1);

  std::thread::sleep(std::time::Duration::from_millis(60));
  registry.handle(fresh);

  assert!(registry.get(stale).is_none());
  assert!(registry.get(fresh).is_some());
  assert_eq!(registry.len(), 1);
}
