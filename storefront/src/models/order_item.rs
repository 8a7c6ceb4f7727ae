// storefront/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: String,
  pub product_name: String,
  pub product_code: String,
  pub product_image: Option<String>,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub subtotal: Decimal,
}

/// A line item before it is attached to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
  pub product_id: String,
  pub product_name: String,
  pub product_code: String,
  pub product_image: Option<String>,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub subtotal: Decimal,
}

impl NewOrderItem {
  pub fn into_order_item(self, order_id: Uuid) -> OrderItem {
    OrderItem {
      id: Uuid::new_v4(),
      order_id,
      product_id: self.product_id,
      product_name: self.product_name,
      product_code: self.product_code,
      product_image: self.product_image,
      quantity: self.quantity,
      unit_price: self.unit_price,
      subtotal: self.subtotal,
    }
  }
}
