// storefront/src/store/memory.rs

use super::{ensure_same_checkout, DataStore, PlacedOrder, ProductQuery};
use crate::catalog;
use crate::errors::{AppError, Result};
use crate::models::{
  Category, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, PaymentStatus, Product, ProductUpdate,
  Profile, Role, ShippingAddress, Subcategory, UserCredentials,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
  products: Vec<Product>,
  categories: Vec<Category>,
  subcategories: Vec<Subcategory>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
  orders_by_token: HashMap<Uuid, Uuid>,
  users: Vec<UserCredentials>,
  profiles: HashMap<Uuid, Profile>,
}

/// In-process store. Each operation runs under a single lock scope, so a
/// multi-row write such as `place_order` is all-or-nothing.
///
/// Writes can be delayed or made to fail, which is how the checkout timeout
/// and failure paths are exercised without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  write_latency: RwLock<Option<Duration>>,
  fail_writes: AtomicBool,
  write_attempts: AtomicUsize,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Delays every subsequent write by `latency`.
  pub fn set_write_latency(&self, latency: Option<Duration>) {
    *self.write_latency.write() = latency;
  }

  /// Makes every subsequent write fail until switched off.
  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Number of writes attempted so far, including failed ones.
  pub fn write_attempts(&self) -> usize {
    self.write_attempts.load(Ordering::SeqCst)
  }

  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }

  pub fn order_item_count(&self) -> usize {
    self.tables.read().order_items.len()
  }

  async fn before_write(&self, op: &'static str) -> Result<()> {
    self.write_attempts.fetch_add(1, Ordering::SeqCst);
    let latency = *self.write_latency.read();
    if let Some(latency) = latency {
      debug!(op, ?latency, "Delaying in-memory write.");
      tokio::time::sleep(latency).await;
    }
    if self.fail_writes.load(Ordering::SeqCst) {
      warn!(op, "In-memory write rejected.");
      return Err(AppError::Internal(format!("store write '{}' failed", op)));
    }
    Ok(())
  }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
  orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  orders
}

#[async_trait]
impl DataStore for MemoryStore {
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let mut products: Vec<Product> = self
      .tables
      .read()
      .products
      .iter()
      .filter(|p| query.matches(p))
      .cloned()
      .collect();
    catalog::sort(&mut products, query.order);
    Ok(products)
  }

  async fn get_product(&self, id: &str) -> Result<Option<Product>> {
    Ok(self.tables.read().products.iter().find(|p| p.id == id).cloned())
  }

  async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(
      tables
        .products
        .iter()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect(),
    )
  }

  async fn create_product(&self, product: NewProduct) -> Result<Product> {
    self.before_write("create_product").await?;
    let product = product.into_product();
    let mut tables = self.tables.write();
    if tables.products.iter().any(|p| p.id == product.id) {
      return Err(AppError::Validation(format!("Product '{}' already exists.", product.id)));
    }
    if tables.products.iter().any(|p| p.code == product.code) {
      return Err(AppError::Validation(format!("Product code '{}' is taken.", product.code)));
    }
    tables.products.push(product.clone());
    Ok(product)
  }

  async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product> {
    self.before_write("update_product").await?;
    let mut tables = self.tables.write();
    let product = tables
      .products
      .iter_mut()
      .find(|p| p.id == id)
      .ok_or_else(|| AppError::NotFound(format!("Product '{}'", id)))?;
    update.apply_to(product);
    Ok(product.clone())
  }

  async fn delete_product(&self, id: &str) -> Result<()> {
    self.before_write("delete_product").await?;
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != id);
    if tables.products.len() == before {
      return Err(AppError::NotFound(format!("Product '{}'", id)));
    }
    Ok(())
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by_key(|c| c.position);
    Ok(categories)
  }

  async fn list_subcategories(&self, category_id: Option<Uuid>) -> Result<Vec<Subcategory>> {
    let mut subs: Vec<Subcategory> = self
      .tables
      .read()
      .subcategories
      .iter()
      .filter(|s| category_id.map_or(true, |c| s.category_id == c))
      .cloned()
      .collect();
    subs.sort_by_key(|s| (s.category_id, s.position));
    Ok(subs)
  }

  async fn create_category(&self, name: &str, position: i32) -> Result<Category> {
    self.before_write("create_category").await?;
    let category = Category {
      id: Uuid::new_v4(),
      name: name.to_string(),
      position,
    };
    self.tables.write().categories.push(category.clone());
    Ok(category)
  }

  async fn create_subcategory(&self, category_id: Uuid, name: &str, position: i32) -> Result<Subcategory> {
    self.before_write("create_subcategory").await?;
    let mut tables = self.tables.write();
    if !tables.categories.iter().any(|c| c.id == category_id) {
      return Err(AppError::NotFound(format!("Category {}", category_id)));
    }
    let sub = Subcategory {
      id: Uuid::new_v4(),
      category_id,
      name: name.to_string(),
      position,
    };
    tables.subcategories.push(sub.clone());
    Ok(sub)
  }

  async fn set_category_positions(&self, positions: &[(Uuid, i32)]) -> Result<()> {
    self.before_write("set_category_positions").await?;
    let mut tables = self.tables.write();
    if let Some((missing, _)) = positions
      .iter()
      .find(|(id, _)| !tables.categories.iter().any(|c| c.id == *id))
    {
      return Err(AppError::NotFound(format!("Category {}", missing)));
    }
    for (id, position) in positions {
      if let Some(category) = tables.categories.iter_mut().find(|c| c.id == *id) {
        category.position = *position;
      }
    }
    Ok(())
  }

  #[instrument(name = "MemoryStore::place_order", skip_all, fields(token = %order.checkout_token, items = items.len()))]
  async fn place_order(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<PlacedOrder> {
    self.before_write("place_order").await?;
    let mut tables = self.tables.write();

    if let Some(existing_id) = tables.orders_by_token.get(&order.checkout_token).copied() {
      if let Some(existing) = tables.orders.iter().find(|o| o.id == existing_id) {
        let existing_items: Vec<OrderItem> = tables
          .order_items
          .iter()
          .filter(|i| i.order_id == existing_id)
          .cloned()
          .collect();
        ensure_same_checkout(existing, &existing_items, &order, &items)?;
        info!(order_id = %existing.id, "Checkout token already used, returning existing order.");
        return Ok(PlacedOrder {
          order: existing.clone(),
          replayed: true,
        });
      }
    }

    let created = Order {
      id: Uuid::new_v4(),
      user_id: order.user_id,
      subtotal: order.subtotal,
      shipping_fee: order.shipping_fee,
      total: order.total,
      status: OrderStatus::Pending,
      payment_method: order.payment_method,
      payment_status: PaymentStatus::Pending,
      shipping_address: Json(order.shipping_address),
      checkout_token: order.checkout_token,
      created_at: Utc::now(),
    };
    let order_id = created.id;
    tables
      .order_items
      .extend(items.into_iter().map(|item| item.into_order_item(order_id)));
    tables.orders_by_token.insert(created.checkout_token, order_id);
    tables.orders.push(created.clone());
    info!(%order_id, "Order written.");
    Ok(PlacedOrder {
      order: created,
      replayed: false,
    })
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.tables.read().orders.iter().find(|o| o.id == id).cloned())
  }

  async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
    Ok(
      self
        .tables
        .read()
        .order_items
        .iter()
        .filter(|i| i.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let orders = self
      .tables
      .read()
      .orders
      .iter()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect();
    Ok(newest_first(orders))
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    Ok(newest_first(self.tables.read().orders.clone()))
  }

  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
    self.before_write("set_order_status").await?;
    let mut tables = self.tables.write();
    let order = tables
      .orders
      .iter_mut()
      .find(|o| o.id == id)
      .ok_or_else(|| AppError::NotFound(format!("Order {}", id)))?;
    order.status = status;
    Ok(order.clone())
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserCredentials> {
    self.before_write("create_user").await?;
    let email = email.to_lowercase();
    let mut tables = self.tables.write();
    if tables.users.iter().any(|u| u.email == email) {
      return Err(AppError::Validation(
        "An account with this email already exists.".to_string(),
      ));
    }
    let user = UserCredentials {
      id: Uuid::new_v4(),
      email,
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    tables.users.push(user.clone());
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
    let email = email.to_lowercase();
    Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    Ok(self.tables.read().profiles.get(&user_id).cloned())
  }

  async fn upsert_profile(&self, mut profile: Profile) -> Result<Profile> {
    self.before_write("upsert_profile").await?;
    profile.updated_at = Utc::now();
    self.tables.write().profiles.insert(profile.user_id, profile.clone());
    Ok(profile)
  }

  async fn set_role(&self, user_id: Uuid, role: Role) -> Result<Profile> {
    self.before_write("set_role").await?;
    let mut tables = self.tables.write();
    let profile = tables
      .profiles
      .get_mut(&user_id)
      .ok_or_else(|| AppError::NotFound(format!("Profile for user {}", user_id)))?;
    profile.role = role;
    profile.updated_at = Utc::now();
    Ok(profile.clone())
  }

  async fn save_address(&self, user_id: Uuid, address: &ShippingAddress) -> Result<()> {
    self.before_write("save_address").await?;
    let mut tables = self.tables.write();
    let profile = tables
      .profiles
      .entry(user_id)
      .or_insert_with(|| Profile::new(user_id, Role::Customer));
    profile.full_name = Some(address.full_name.clone());
    profile.phone = Some(address.phone.clone());
    profile.saved_address = Some(Json(address.clone()));
    profile.updated_at = Utc::now();
    Ok(())
  }
}
