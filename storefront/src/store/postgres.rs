// storefront/src/store/postgres.rs

use super::{ensure_same_checkout, DataStore, PlacedOrder, ProductQuery};
use crate::catalog::SortKey;
use crate::errors::{AppError, Result};
use crate::models::{
  Category, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, PaymentStatus, Product, ProductUpdate,
  Profile, Role, ShippingAddress, Subcategory, UserCredentials,
};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
  "id, name, code, description, price, image_url, category_id, subcategory_id, is_active, created_at";
const ORDER_COLUMNS: &str = "id, user_id, subtotal, shipping_fee, total, status, payment_method, payment_status, \
                             shipping_address, checkout_token, created_at";
const ORDER_ITEM_COLUMNS: &str =
  "id, order_id, product_id, product_name, product_code, product_image, quantity, unit_price, subtotal";
const PROFILE_COLUMNS: &str = "user_id, full_name, phone, role, saved_address, updated_at";

/// PostgreSQL backend. Tables are created by `schema.sql`.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

/// Maps a unique-constraint violation to a validation error with `message`.
fn unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
  match &err {
    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Validation(message()),
    _ => AppError::Sqlx(err),
  }
}

#[async_trait]
impl DataStore for PgStore {
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {} FROM products WHERE TRUE", PRODUCT_COLUMNS));
    if query.only_active {
      qb.push(" AND is_active");
    }
    if let Some(category_id) = query.category_id {
      qb.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(subcategory_id) = query.subcategory_id {
      qb.push(" AND subcategory_id = ").push_bind(subcategory_id);
    }
    if let Some(min) = query.min_price {
      qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
      qb.push(" AND price <= ").push_bind(max);
    }
    qb.push(match query.order {
      SortKey::Newest => " ORDER BY created_at DESC",
      SortKey::PriceLowHigh => " ORDER BY price ASC",
      SortKey::PriceHighLow => " ORDER BY price DESC",
      SortKey::NameAz => " ORDER BY lower(name) ASC",
    });
    Ok(qb.build_query_as::<Product>().fetch_all(&self.pool).await?)
  }

  async fn get_product(&self, id: &str) -> Result<Option<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    Ok(sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
    Ok(sqlx::query_as::<_, Product>(&sql).bind(ids).fetch_all(&self.pool).await?)
  }

  async fn create_product(&self, product: NewProduct) -> Result<Product> {
    let p = product.into_product();
    let sql = format!(
      "INSERT INTO products ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
      cols = PRODUCT_COLUMNS
    );
    let code = p.code.clone();
    sqlx::query_as::<_, Product>(&sql)
      .bind(&p.id)
      .bind(&p.name)
      .bind(&p.code)
      .bind(&p.description)
      .bind(p.price)
      .bind(&p.image_url)
      .bind(p.category_id)
      .bind(p.subcategory_id)
      .bind(p.is_active)
      .bind(p.created_at)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| unique_violation(e, || format!("Product id or code '{}' is taken.", code)))
  }

  async fn update_product(&self, id: &str, update: ProductUpdate) -> Result<Product> {
    let mut tx = self.pool.begin().await?;
    let sql = format!("SELECT {} FROM products WHERE id = $1 FOR UPDATE", PRODUCT_COLUMNS);
    let mut product = sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Product '{}'", id)))?;
    update.apply_to(&mut product);

    let sql = format!(
      "UPDATE products SET name = $2, code = $3, description = $4, price = $5, image_url = $6, \
       category_id = $7, subcategory_id = $8, is_active = $9 WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    );
    let updated = sqlx::query_as::<_, Product>(&sql)
      .bind(&product.id)
      .bind(&product.name)
      .bind(&product.code)
      .bind(&product.description)
      .bind(product.price)
      .bind(&product.image_url)
      .bind(product.category_id)
      .bind(product.subcategory_id)
      .bind(product.is_active)
      .fetch_one(&mut *tx)
      .await?;
    tx.commit().await?;
    Ok(updated)
  }

  async fn delete_product(&self, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound(format!("Product '{}'", id)));
    }
    Ok(())
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    Ok(
      sqlx::query_as::<_, Category>("SELECT id, name, position FROM categories ORDER BY position, name")
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn list_subcategories(&self, category_id: Option<Uuid>) -> Result<Vec<Subcategory>> {
    Ok(
      sqlx::query_as::<_, Subcategory>(
        "SELECT id, category_id, name, position FROM subcategories \
         WHERE ($1::uuid IS NULL OR category_id = $1) ORDER BY category_id, position",
      )
      .bind(category_id)
      .fetch_all(&self.pool)
      .await?,
    )
  }

  async fn create_category(&self, name: &str, position: i32) -> Result<Category> {
    Ok(
      sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, position) VALUES ($1, $2, $3) RETURNING id, name, position",
      )
      .bind(Uuid::new_v4())
      .bind(name)
      .bind(position)
      .fetch_one(&self.pool)
      .await?,
    )
  }

  async fn create_subcategory(&self, category_id: Uuid, name: &str, position: i32) -> Result<Subcategory> {
    Ok(
      sqlx::query_as::<_, Subcategory>(
        "INSERT INTO subcategories (id, category_id, name, position) VALUES ($1, $2, $3, $4) \
         RETURNING id, category_id, name, position",
      )
      .bind(Uuid::new_v4())
      .bind(category_id)
      .bind(name)
      .bind(position)
      .fetch_one(&self.pool)
      .await?,
    )
  }

  async fn set_category_positions(&self, positions: &[(Uuid, i32)]) -> Result<()> {
    let mut tx = self.pool.begin().await?;
    for (id, position) in positions {
      let result = sqlx::query("UPDATE categories SET position = $2 WHERE id = $1")
        .bind(id)
        .bind(position)
        .execute(&mut *tx)
        .await?;
      if result.rows_affected() == 0 {
        // Dropping the transaction rolls back the rows already updated.
        return Err(AppError::NotFound(format!("Category {}", id)));
      }
    }
    tx.commit().await?;
    Ok(())
  }

  #[instrument(name = "PgStore::place_order", skip_all, fields(token = %order.checkout_token, items = items.len()))]
  async fn place_order(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<PlacedOrder> {
    let mut tx = self.pool.begin().await?;

    let sql = format!(
      "INSERT INTO orders (id, user_id, subtotal, shipping_fee, total, status, payment_method, payment_status, \
       shipping_address, checkout_token) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
       ON CONFLICT (checkout_token) DO NOTHING RETURNING {}",
      ORDER_COLUMNS
    );
    let inserted = sqlx::query_as::<_, Order>(&sql)
      .bind(Uuid::new_v4())
      .bind(order.user_id)
      .bind(order.subtotal)
      .bind(order.shipping_fee)
      .bind(order.total)
      .bind(OrderStatus::Pending)
      .bind(order.payment_method)
      .bind(PaymentStatus::Pending)
      .bind(Json(&order.shipping_address))
      .bind(order.checkout_token)
      .fetch_optional(&mut *tx)
      .await?;

    let created = match inserted {
      Some(created) => created,
      None => {
        let sql = format!("SELECT {} FROM orders WHERE checkout_token = $1", ORDER_COLUMNS);
        let existing = sqlx::query_as::<_, Order>(&sql)
          .bind(order.checkout_token)
          .fetch_one(&mut *tx)
          .await?;
        let sql = format!("SELECT {} FROM order_items WHERE order_id = $1", ORDER_ITEM_COLUMNS);
        let existing_items = sqlx::query_as::<_, OrderItem>(&sql)
          .bind(existing.id)
          .fetch_all(&mut *tx)
          .await?;
        tx.commit().await?;
        ensure_same_checkout(&existing, &existing_items, &order, &items)?;
        info!(order_id = %existing.id, "Checkout token already used, returning existing order.");
        return Ok(PlacedOrder {
          order: existing,
          replayed: true,
        });
      }
    };

    let item_count = items.len();
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("INSERT INTO order_items ({}) ", ORDER_ITEM_COLUMNS));
    qb.push_values(items, |mut row, item| {
      row
        .push_bind(Uuid::new_v4())
        .push_bind(created.id)
        .push_bind(item.product_id)
        .push_bind(item.product_name)
        .push_bind(item.product_code)
        .push_bind(item.product_image)
        .push_bind(item.quantity)
        .push_bind(item.unit_price)
        .push_bind(item.subtotal);
    });
    if item_count > 0 {
      if let Err(e) = qb.build().execute(&mut *tx).await {
        error!(error = %e, order_id = %created.id, "Order item insert failed, rolling back order.");
        return Err(e.into());
      }
    }

    match tx.commit().await {
      Ok(()) => debug!("Successfully committed order transaction"),
      Err(e) => {
        error!("Failed to commit order transaction: {}", e);
        return Err(e.into());
      }
    }
    info!(order_id = %created.id, item_count, "Order written.");
    Ok(PlacedOrder {
      order: created,
      replayed: false,
    })
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
    let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
    Ok(sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
    let sql = format!("SELECT {} FROM order_items WHERE order_id = $1", ORDER_ITEM_COLUMNS);
    Ok(sqlx::query_as::<_, OrderItem>(&sql).bind(order_id).fetch_all(&self.pool).await?)
  }

  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let sql = format!(
      "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
      ORDER_COLUMNS
    );
    Ok(sqlx::query_as::<_, Order>(&sql).bind(user_id).fetch_all(&self.pool).await?)
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    let sql = format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS);
    Ok(sqlx::query_as::<_, Order>(&sql).fetch_all(&self.pool).await?)
  }

  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
    let sql = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {}", ORDER_COLUMNS);
    sqlx::query_as::<_, Order>(&sql)
      .bind(id)
      .bind(status)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Order {}", id)))
  }

  async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserCredentials> {
    sqlx::query_as::<_, UserCredentials>(
      "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING id, email, password_hash, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(email.to_lowercase())
    .bind(password_hash)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| unique_violation(e, || "An account with this email already exists.".to_string()))
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
    Ok(
      sqlx::query_as::<_, UserCredentials>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
      )
      .bind(email.to_lowercase())
      .fetch_optional(&self.pool)
      .await?,
    )
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let sql = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
    Ok(sqlx::query_as::<_, Profile>(&sql).bind(user_id).fetch_optional(&self.pool).await?)
  }

  async fn upsert_profile(&self, profile: Profile) -> Result<Profile> {
    let sql = format!(
      "INSERT INTO profiles (user_id, full_name, phone, role, saved_address, updated_at) \
       VALUES ($1, $2, $3, $4, $5, now()) \
       ON CONFLICT (user_id) DO UPDATE SET full_name = EXCLUDED.full_name, phone = EXCLUDED.phone, \
       role = EXCLUDED.role, saved_address = EXCLUDED.saved_address, updated_at = now() \
       RETURNING {}",
      PROFILE_COLUMNS
    );
    Ok(
      sqlx::query_as::<_, Profile>(&sql)
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(profile.role)
        .bind(&profile.saved_address)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  async fn set_role(&self, user_id: Uuid, role: Role) -> Result<Profile> {
    let sql = format!(
      "UPDATE profiles SET role = $2, updated_at = now() WHERE user_id = $1 RETURNING {}",
      PROFILE_COLUMNS
    );
    sqlx::query_as::<_, Profile>(&sql)
      .bind(user_id)
      .bind(role)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Profile for user {}", user_id)))
  }

  async fn save_address(&self, user_id: Uuid, address: &ShippingAddress) -> Result<()> {
    sqlx::query(
      "INSERT INTO profiles (user_id, full_name, phone, role, saved_address, updated_at) \
       VALUES ($1, $2, $3, 'customer', $4, now()) \
       ON CONFLICT (user_id) DO UPDATE SET full_name = EXCLUDED.full_name, phone = EXCLUDED.phone, \
       saved_address = EXCLUDED.saved_address, updated_at = now()",
    )
    .bind(user_id)
    .bind(&address.full_name)
    .bind(&address.phone)
    .bind(Json(address))
    .execute(&self.pool)
    .await?;
    Ok(())
  }
}
