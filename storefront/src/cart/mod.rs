// storefront/src/cart/mod.rs

//! The cart engine.
//!
//! A [`Cart`] is an ordered list of lines, at most one per product, plus the
//! visibility flag of the cart drawer. It lives for one browser session and
//! is never persisted. Callers mutate it through a [`CartHandle`]; the
//! [`CartRegistry`] hands out one handle per session key.

mod handle;
mod registry;

pub use handle::CartHandle;
pub use registry::CartRegistry;

use crate::models::Product;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub product_id: String,
  pub name: String,
  pub unit_price: Decimal,
  pub image_ref: Option<String>,
  /// Never below 1.
  pub quantity: u32,
}

impl CartLine {
  pub fn for_product(product: &Product) -> Self {
    Self {
      product_id: product.id.clone(),
      name: product.name.clone(),
      unit_price: product.price,
      image_ref: product.image_url.clone(),
      quantity: 1,
    }
  }

  pub fn subtotal(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
  lines: Vec<CartLine>,
  drawer_open: bool,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one unit of `product`. A product already in the cart gets its
  /// quantity bumped instead of a second line. Always opens the drawer.
  pub fn add_item(&mut self, product: &Product) {
    match self.lines.iter_mut().find(|l| l.product_id == product.id) {
      Some(line) => line.quantity = line.quantity.saturating_add(1),
      None => self.lines.push(CartLine::for_product(product)),
    }
    self.drawer_open = true;
  }

  /// Removes the line for `product_id`; unknown ids are ignored.
  pub fn remove_item(&mut self, product_id: &str) {
    self.lines.retain(|l| l.product_id != product_id);
  }

  /// Sets a line's quantity, clamped to at least 1. Never removes a line;
  /// unknown ids are ignored.
  pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
    if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
      line.quantity = quantity.clamp(1, i64::from(u32::MAX)) as u32;
    }
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  /// Takes the units of `ordered` out of the cart. Anything added after
  /// those lines were captured stays.
  pub fn remove_ordered(&mut self, ordered: &[CartLine]) {
    for done in ordered {
      if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == done.product_id) {
        line.quantity = line.quantity.saturating_sub(done.quantity);
      }
    }
    self.lines.retain(|l| l.quantity > 0);
  }

  /// Exact sum of unit price times quantity over all lines.
  pub fn total(&self) -> Decimal {
    self.lines.iter().map(CartLine::subtotal).sum()
  }

  pub fn item_count(&self) -> u64 {
    self.lines.iter().map(|l| u64::from(l.quantity)).sum()
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn line(&self, product_id: &str) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn drawer_open(&self) -> bool {
    self.drawer_open
  }

  pub fn toggle_drawer(&mut self) {
    self.drawer_open = !self.drawer_open;
  }

  pub fn open_drawer(&mut self) {
    self.drawer_open = true;
  }

  pub fn close_drawer(&mut self) {
    self.drawer_open = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn product(id: &str, price: i64) -> Product {
    Product {
      id: id.to_string(),
      name: format!("Product {}", id),
      code: format!("SKU-{}", id),
      description: None,
      price: Decimal::from(price),
      image_url: None,
      category_id: None,
      subcategory_id: None,
      is_active: true,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn adding_twice_bumps_quantity() {
    let mut cart = Cart::new();
    cart.add_item(&product("A", 100));
    cart.add_item(&product("B", 5));
    cart.add_item(&product("A", 100));

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.lines()[0].product_id, "A");
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), Decimal::from(205));
  }

  #[test]
  fn remove_ordered_keeps_later_additions() {
    let mut cart = Cart::new();
    cart.add_item(&product("A", 100));
    cart.add_item(&product("A", 100));
    let ordered = cart.lines().to_vec();

    cart.add_item(&product("A", 100));
    cart.add_item(&product("B", 5));
    cart.remove_ordered(&ordered);

    assert_eq!(cart.line("A").map(|l| l.quantity), Some(1));
    assert_eq!(cart.line("B").map(|l| l.quantity), Some(1));

    let rest = cart.lines().to_vec();
    cart.remove_ordered(&rest);
    assert!(cart.is_empty());
  }

  #[test]
  fn add_opens_drawer() {
    let mut cart = Cart::new();
    assert!(!cart.drawer_open());
    cart.add_item(&product("A", 1));
    assert!(cart.drawer_open());
    cart.toggle_drawer();
    assert!(!cart.drawer_open());
  }

  #[test]
  fn quantity_clamps_to_one() {
    let mut cart = Cart::new();
    cart.add_item(&product("A", 10));
    cart.set_quantity("A", 0);
    assert_eq!(cart.line("A").map(|l| l.quantity), Some(1));
    cart.set_quantity("A", -7);
    assert_eq!(cart.line("A").map(|l| l.quantity), Some(1));
    cart.set_quantity("A", 4);
    assert_eq!(cart.total(), Decimal::from(40));
  }

  #[test]
  fn unknown_ids_are_ignored() {
    let mut cart = Cart::new();
    cart.add_item(&product("A", 10));
    let before = cart.clone();
    cart.remove_item("Z");
    cart.set_quantity("Z", 9);
    assert_eq!(cart, before);
  }

  #[test]
  fn decimal_total_is_exact() {
    let mut cart = Cart::new();
    let mut p = product("A", 0);
    p.price = Decimal::new(10, 2); // 0.10
    cart.add_item(&p);
    cart.set_quantity("A", 3);
    assert_eq!(cart.total(), Decimal::new(30, 2));
  }
}
