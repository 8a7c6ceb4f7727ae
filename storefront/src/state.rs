// storefront/src/state.rs
use crate::cart::CartRegistry;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{AdminService, CheckoutAssembler, IdentityProvider, SessionIdentity, ShippingPolicy};
use crate::store::{seed, DataStore, MemoryStore, PgStore};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DataStore>,
  pub identity: Arc<dyn IdentityProvider>,
  pub carts: Arc<CartRegistry>,
  pub checkout: Arc<CheckoutAssembler>,
  pub admin: Arc<AdminService>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires every service around `store`.
  pub fn new(config: Arc<AppConfig>, store: Arc<dyn DataStore>) -> Self {
    let identity = SessionIdentity::new(
      store.clone(),
      config.min_password_len,
      config.bootstrap_admin_email.clone(),
    );
    let checkout = CheckoutAssembler::new(
      store.clone(),
      ShippingPolicy::from(config.as_ref()),
      config.checkout_timeout,
    );
    Self {
      identity: Arc::new(identity),
      carts: Arc::new(CartRegistry::with_idle_timeout(config.cart_idle_timeout)),
      checkout: Arc::new(checkout),
      admin: Arc::new(AdminService::new(store.clone())),
      store,
      config,
    }
  }

  /// Picks the backend from the configuration and seeds it when asked to.
  pub async fn from_config(config: Arc<AppConfig>) -> Result<Self> {
    let store: Arc<dyn DataStore> = match &config.database_url {
      Some(url) => Arc::new(PgStore::connect(url).await?),
      None => {
        info!("DATABASE_URL not set, using the in-memory store.");
        Arc::new(MemoryStore::new())
      }
    };
    if config.seed_db {
      seed::seed_demo_catalog(store.as_ref()).await?;
    }
    Ok(Self::new(config, store))
  }
}
