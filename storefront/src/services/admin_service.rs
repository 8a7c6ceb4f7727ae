// storefront/src/services/admin_service.rs

//! Back-office operations: order status, user roles, product maintenance
//! and category ordering.

use crate::errors::{AppError, Result};
use crate::models::{Category, NewProduct, Order, OrderStatus, OrderWithItems, Product, ProductUpdate, Profile, Role};
use crate::services::optimistic::{move_item, OptimisticList};
use crate::store::DataStore;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct AdminService {
  store: Arc<dyn DataStore>,
}

impl AdminService {
  pub fn new(store: Arc<dyn DataStore>) -> Self {
    Self { store }
  }

  pub async fn list_orders(&self) -> Result<Vec<Order>> {
    self.store.list_orders().await
  }

  pub async fn order_with_items(&self, order_id: Uuid) -> Result<OrderWithItems> {
    let order = self
      .store
      .get_order(order_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;
    let items = self.store.order_items(order_id).await?;
    Ok(OrderWithItems { order, items })
  }

  /// Any status may follow any other; payment status is left alone.
  #[instrument(name = "admin::set_order_status", skip(self), err(Display))]
  pub async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order> {
    let order = self.store.set_order_status(order_id, status).await?;
    info!(%order_id, %status, "Order status changed.");
    Ok(order)
  }

  #[instrument(name = "admin::set_user_role", skip(self), err(Display))]
  pub async fn set_user_role(&self, user_id: Uuid, role: Role) -> Result<Profile> {
    let profile = self.store.set_role(user_id, role).await?;
    info!(%user_id, ?role, "User role changed.");
    Ok(profile)
  }

  #[instrument(name = "admin::create_product", skip_all, err(Display), fields(code = %product.code))]
  pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
    product.validate()?;
    let created = self.store.create_product(product).await?;
    info!(product_id = %created.id, "Product created.");
    Ok(created)
  }

  #[instrument(name = "admin::update_product", skip(self, update), err(Display))]
  pub async fn update_product(&self, product_id: &str, update: ProductUpdate) -> Result<Product> {
    update.validate()?;
    self.store.update_product(product_id, update).await
  }

  #[instrument(name = "admin::delete_product", skip(self), err(Display))]
  pub async fn delete_product(&self, product_id: &str) -> Result<()> {
    self.store.delete_product(product_id).await?;
    info!(%product_id, "Product deleted.");
    Ok(())
  }

  /// Loads the categories into a list the caller can reorder optimistically.
  pub async fn category_list(&self) -> Result<OptimisticList<Category>> {
    Ok(OptimisticList::new(self.store.list_categories().await?))
  }

  /// Moves one category and renumbers positions 0..n. The list shows the new
  /// order at once and reverts if the store rejects the write.
  #[instrument(name = "admin::reorder_categories", skip(self, list), err(Display))]
  pub async fn reorder_categories(&self, list: &OptimisticList<Category>, from: usize, to: usize) -> Result<()> {
    let len = list.len();
    if from >= len || to >= len {
      return Err(AppError::Validation(format!(
        "Cannot move position {} to {} in a list of {}.",
        from, to, len
      )));
    }
    let store = self.store.clone();
    list
      .apply(
        |categories| {
          if move_item(categories, from, to).is_ok() {
            renumber(categories);
          }
        },
        |categories| async move {
          let positions: Vec<(Uuid, i32)> = categories.iter().map(|c| (c.id, c.position)).collect();
          store.set_category_positions(&positions).await
        },
      )
      .await
  }
}

fn renumber(categories: &mut [Category]) {
  for (idx, category) in categories.iter_mut().enumerate() {
    category.position = idx as i32;
  }
}
