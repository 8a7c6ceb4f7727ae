// storefront/src/models/order.rs

use crate::models::{OrderItem, ShippingAddress};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_method", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
  #[default]
  Cod,
  CreditCard,
  Upi,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Paid,
  Failed,
  Refunded,
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub subtotal: Decimal,
  pub shipping_fee: Decimal,
  pub total: Decimal,
  pub status: OrderStatus,
  pub payment_method: PaymentMethod,
  pub payment_status: PaymentStatus,
  pub shipping_address: Json<ShippingAddress>,
  pub checkout_token: Uuid,
  pub created_at: DateTime<Utc>,
}

/// What checkout hands to the store; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub subtotal: Decimal,
  pub shipping_fee: Decimal,
  pub total: Decimal,
  pub payment_method: PaymentMethod,
  pub shipping_address: ShippingAddress,
  /// Retrying with the same token yields the order already written.
  pub checkout_token: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}
