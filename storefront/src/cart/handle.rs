// storefront/src/cart/handle.rs

use super::{Cart, CartLine};
use crate::models::Product;
use rust_decimal::Decimal;
use storefront_core::ContextData;

/// Shared handle to one session's cart. Clones point at the same cart.
///
/// Every operation takes the lock for its own duration only, so a handle is
/// safe to use from async code as long as no guard from [`CartHandle::read`]
/// is kept across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct CartHandle {
  inner: ContextData<Cart>,
}

impl CartHandle {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_item(&self, product: &Product) {
    self.inner.update(|cart| cart.add_item(product));
  }

  pub fn remove_item(&self, product_id: &str) {
    self.inner.update(|cart| cart.remove_item(product_id));
  }

  pub fn set_quantity(&self, product_id: &str, quantity: i64) {
    self.inner.update(|cart| cart.set_quantity(product_id, quantity));
  }

  pub fn clear(&self) {
    self.inner.update(Cart::clear);
  }

  pub fn remove_ordered(&self, ordered: &[CartLine]) {
    self.inner.update(|cart| cart.remove_ordered(ordered));
  }

  pub fn toggle_drawer(&self) {
    self.inner.update(Cart::toggle_drawer);
  }

  pub fn open_drawer(&self) {
    self.inner.update(Cart::open_drawer);
  }

  pub fn close_drawer(&self) {
    self.inner.update(Cart::close_drawer);
  }

  pub fn total(&self) -> Decimal {
    self.inner.read().total()
  }

  pub fn item_count(&self) -> u64 {
    self.inner.read().item_count()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.read().is_empty()
  }

  pub fn lines(&self) -> Vec<CartLine> {
    self.inner.read().lines().to_vec()
  }

  pub fn line(&self, product_id: &str) -> Option<CartLine> {
    self.inner.read().line(product_id).cloned()
  }

  pub fn snapshot(&self) -> Cart {
    self.inner.snapshot()
  }

  pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, Cart> {
    self.inner.read()
  }
}
