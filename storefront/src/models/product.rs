// storefront/src/models/product.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub code: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub image_url: Option<String>,
  pub category_id: Option<Uuid>,
  pub subcategory_id: Option<Uuid>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  /// Generated when absent.
  #[serde(default)]
  pub id: Option<String>,
  pub name: String,
  pub code: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: Decimal,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub category_id: Option<Uuid>,
  #[serde(default)]
  pub subcategory_id: Option<Uuid>,
  #[serde(default = "default_active")]
  pub is_active: bool,
}

fn default_active() -> bool {
  true
}

impl NewProduct {
  pub fn validate(&self) -> Result<(), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name is required.".to_string()));
    }
    if self.code.trim().is_empty() {
      return Err(AppError::Validation("Product code is required.".to_string()));
    }
    if self.price.is_sign_negative() {
      return Err(AppError::Validation("Product price cannot be negative.".to_string()));
    }
    Ok(())
  }

  pub fn into_product(self) -> Product {
    Product {
      id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
      name: self.name.trim().to_string(),
      code: self.code.trim().to_string(),
      description: self.description,
      price: self.price,
      image_url: self.image_url,
      category_id: self.category_id,
      subcategory_id: self.subcategory_id,
      is_active: self.is_active,
      created_at: Utc::now(),
    }
  }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
  pub name: Option<String>,
  pub code: Option<String>,
  pub description: Option<String>,
  pub price: Option<Decimal>,
  pub image_url: Option<String>,
  pub category_id: Option<Uuid>,
  pub subcategory_id: Option<Uuid>,
  pub is_active: Option<bool>,
}

impl ProductUpdate {
  pub fn validate(&self) -> Result<(), AppError> {
    if matches!(&self.name, Some(n) if n.trim().is_empty()) {
      return Err(AppError::Validation("Product name cannot be blank.".to_string()));
    }
    if matches!(&self.code, Some(c) if c.trim().is_empty()) {
      return Err(AppError::Validation("Product code cannot be blank.".to_string()));
    }
    if matches!(self.price, Some(p) if p.is_sign_negative()) {
      return Err(AppError::Validation("Product price cannot be negative.".to_string()));
    }
    Ok(())
  }

  pub fn apply_to(self, product: &mut Product) {
    if let Some(name) = self.name {
      product.name = name.trim().to_string();
    }
    if let Some(code) = self.code {
      product.code = code.trim().to_string();
    }
    if self.description.is_some() {
      product.description = self.description;
    }
    if let Some(price) = self.price {
      product.price = price;
    }
    if self.image_url.is_some() {
      product.image_url = self.image_url;
    }
    if self.category_id.is_some() {
      product.category_id = self.category_id;
    }
    if self.subcategory_id.is_some() {
      product.subcategory_id = self.subcategory_id;
    }
    if let Some(active) = self.is_active {
      product.is_active = active;
    }
  }
}
