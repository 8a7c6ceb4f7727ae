// storefront/src/models/category.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  /// Display order, ascending.
  pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subcategory {
  pub id: Uuid,
  pub category_id: Uuid,
  pub name: String,
  pub position: i32,
}
