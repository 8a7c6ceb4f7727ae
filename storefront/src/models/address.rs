// storefront/src/models/address.rs

use crate::errors::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub full_name: String,
  pub phone: String,
  pub address_line1: String,
  #[serde(default)]
  pub address_line2: Option<String>,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
}

impl ShippingAddress {
  /// First mandatory field that is empty or whitespace, in form order.
  pub fn first_missing_field(&self) -> Option<&'static str> {
    let required: [(&'static str, &str); 7] = [
      ("Full name", &self.full_name),
      ("Phone", &self.phone),
      ("Address line 1", &self.address_line1),
      ("City", &self.city),
      ("State", &self.state),
      ("ZIP code", &self.zip_code),
      ("Country", &self.country),
    ];
    required
      .into_iter()
      .find(|(_, value)| value.trim().is_empty())
      .map(|(label, _)| label)
  }

  pub fn validate(&self) -> Result<(), AppError> {
    match self.first_missing_field() {
      Some(label) => Err(AppError::Validation(format!("{} is required.", label))),
      None => Ok(()),
    }
  }
}
