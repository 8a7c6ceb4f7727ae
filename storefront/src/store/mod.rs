// storefront/src/store/mod.rs

//! The data store gateway.
//!
//! Every read and write of catalog, order and account data goes through the
//! [`DataStore`] trait. Two backends exist: [`MemoryStore`], which is what
//! tests and a database-less server use, and [`PgStore`] over PostgreSQL.

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::catalog::SortKey;
use crate::errors::{AppError, Result};
use crate::models::{
  Category, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, Product, ProductUpdate, Profile, Role,
  ShippingAddress, Subcategory, UserCredentials,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Equality, range and ordering filters evaluated by the store.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
  pub category_id: Option<Uuid>,
  pub subcategory_id: Option<Uuid>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
  pub only_active: bool,
  pub order: SortKey,
}

impl ProductQuery {
  pub fn active() -> Self {
    Self {
      only_active: true,
      ..Self::default()
    }
  }

  pub fn matches(&self, product: &Product) -> bool {
    if self.only_active && !product.is_active {
      return false;
    }
    if self.category_id.is_some() && product.category_id != self.category_id {
      return false;
    }
    if self.subcategory_id.is_some() && product.subcategory_id != self.subcategory_id {
      return false;
    }
    if matches!(self.min_price, Some(min) if product.price < min) {
      return false;
    }
    !matches!(self.max_price, Some(max) if product.price > max)
  }
}

/// Outcome of [`DataStore::place_order`].
#[derive(Debug, Clone)]
pub struct PlacedOrder {
  pub order: Order,
  /// `true` when the checkout token had already produced this order.
  pub replayed: bool,
}

/// Accepts a resubmitted checkout token only when the recorded order is the
/// same checkout: same user, same total and the same lines.
pub(crate) fn ensure_same_checkout(
  existing: &Order,
  existing_items: &[OrderItem],
  order: &NewOrder,
  items: &[NewOrderItem],
) -> Result<()> {
  let reused = || AppError::Conflict("This checkout token was already used for a different order.".to_string());
  if existing.user_id != order.user_id || existing.total != order.total {
    return Err(reused());
  }
  let mut recorded: Vec<(&str, i32, Decimal)> = existing_items
    .iter()
    .map(|i| (i.product_id.as_str(), i.quantity, i.unit_price))
    .collect();
  let mut requested: Vec<(&str, i32, Decimal)> = items
    .iter()
    .map(|i| (i.product_id.as_str(), i.quantity, i.unit_price))
    .collect();
  recorded.sort();
  requested.sort();
  if recorded != requested {
    return Err(reused());
  }
  Ok(())
}

#[async_trait]
pub trait DataStore: Send + Sync {
  // Catalog
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;
  async fn get_product(&self, id: &str) -> Result<Option<Product>>;
  /// One read for many ids; ids with no product are simply absent.
  async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>>;
  async fn create_product(&self, product: NewProduct) -> Result<Product>;
  async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product>;
  async fn delete_product(&self, id: &str) -> Result<()>;

  async fn list_categories(&self) -> Result<Vec<Category>>;
  async fn list_subcategories(&self, category_id: Option<Uuid>) -> Result<Vec<Subcategory>>;
  async fn create_category(&self, name: &str, position: i32) -> Result<Category>;
  async fn create_subcategory(&self, category_id: Uuid, name: &str, position: i32) -> Result<Subcategory>;
  /// Writes all positions or none.
  async fn set_category_positions(&self, positions: &[(Uuid, i32)]) -> Result<()>;

  // Orders
  /// Writes the order and all of its items as one unit. A second call with
  /// the same checkout token returns the first order, marked as replayed,
  /// when it is the same checkout; otherwise it fails with `Conflict`.
  async fn place_order(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<PlacedOrder>;
  async fn get_order(&self, id: Uuid) -> Result<Option<Order>>;
  async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>>;
  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
  async fn list_orders(&self) -> Result<Vec<Order>>;
  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order>;

  // Accounts
  async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserCredentials>;
  async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;
  async fn upsert_profile(&self, profile: Profile) -> Result<Profile>;
  async fn set_role(&self, user_id: Uuid, role: Role) -> Result<Profile>;
  async fn save_address(&self, user_id: Uuid, address: &ShippingAddress) -> Result<()>;
}
