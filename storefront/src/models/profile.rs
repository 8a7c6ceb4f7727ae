// storefront/src/models/profile.rs

use crate::models::ShippingAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Customer,
  Admin,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
  pub user_id: Uuid,
  pub full_name: Option<String>,
  pub phone: Option<String>,
  pub role: Role,
  pub saved_address: Option<Json<ShippingAddress>>,
  pub updated_at: DateTime<Utc>,
}

impl Profile {
  pub fn new(user_id: Uuid, role: Role) -> Self {
    Self {
      user_id,
      full_name: None,
      phone: None,
      role,
      saved_address: None,
      updated_at: Utc::now(),
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}
