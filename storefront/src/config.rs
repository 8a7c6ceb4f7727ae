// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Without a database URL the server runs on the in-memory store.
  pub database_url: Option<String>,

  pub free_shipping_threshold: Decimal,
  pub shipping_fee: Decimal,
  pub currency: String,
  pub checkout_timeout: Duration,
  /// Carts idle for longer than this are dropped.
  pub cart_idle_timeout: Duration,

  pub min_password_len: usize,
  pub bootstrap_admin_email: Option<String>,

  pub seed_db: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      free_shipping_threshold: Decimal::from(500),
      shipping_fee: Decimal::from(50),
      currency: "INR".to_string(),
      checkout_timeout: Duration::from_secs(15),
      cart_idle_timeout: Duration::from_secs(24 * 60 * 60),
      min_password_len: 6,
      bootstrap_admin_email: None,
      seed_db: false,
    }
  }
}

fn parse_var<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    Err(_) => Ok(default),
  }
}

fn optional_var(var_name: &str) -> Option<String> {
  env::var(var_name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    let defaults = Self::default();

    let server_host = optional_var("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var("SERVER_PORT", defaults.server_port)?;
    let database_url = optional_var("DATABASE_URL");

    let free_shipping_threshold = parse_var("FREE_SHIPPING_THRESHOLD", defaults.free_shipping_threshold)?;
    let shipping_fee = parse_var("SHIPPING_FEE", defaults.shipping_fee)?;
    if free_shipping_threshold.is_sign_negative() || shipping_fee.is_sign_negative() {
      return Err(AppError::Config(
        "FREE_SHIPPING_THRESHOLD and SHIPPING_FEE must not be negative".to_string(),
      ));
    }
    let currency = optional_var("CURRENCY").unwrap_or(defaults.currency);

    let timeout_secs: u64 = parse_var("CHECKOUT_TIMEOUT_SECS", defaults.checkout_timeout.as_secs())?;
    if timeout_secs == 0 {
      return Err(AppError::Config("CHECKOUT_TIMEOUT_SECS must be at least 1".to_string()));
    }

    let cart_idle_secs: u64 = parse_var("CART_IDLE_TIMEOUT_SECS", defaults.cart_idle_timeout.as_secs())?;

    let min_password_len = parse_var("MIN_PASSWORD_LEN", defaults.min_password_len)?;
    let bootstrap_admin_email = optional_var("BOOTSTRAP_ADMIN_EMAIL").map(|e| e.to_lowercase());
    let seed_db = parse_var("SEED_DB", defaults.seed_db)?;

    tracing::info!(
      in_memory_store = database_url.is_none(),
      %free_shipping_threshold,
      %shipping_fee,
      %currency,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      free_shipping_threshold,
      shipping_fee,
      currency,
      checkout_timeout: Duration::from_secs(timeout_secs),
      cart_idle_timeout: Duration::from_secs(cart_idle_secs),
      min_password_len,
      bootstrap_admin_email,
      seed_db,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
