// storefront/src/cart/registry.rs

use super::CartHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug)]
struct Entry {
  handle: CartHandle,
  last_touched: Instant,
}

/// One cart per browser session key.
///
/// Carts untouched for longer than the idle timeout are dropped whenever a
/// new session's cart is created.
#[derive(Debug)]
pub struct CartRegistry {
  carts: RwLock<HashMap<Uuid, Entry>>,
  idle_timeout: Duration,
}

impl Default for CartRegistry {
  fn default() -> Self {
    Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
  }
}

impl CartRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
    Self {
      carts: RwLock::new(HashMap::new()),
      idle_timeout,
    }
  }

  /// Returns the session's cart, creating an empty one on first use.
  /// Only paths that change the cart should call this.
  pub fn handle(&self, session: Uuid) -> CartHandle {
    let mut carts = self.carts.write();
    let now = Instant::now();
    if let Some(entry) = carts.get_mut(&session) {
      entry.last_touched = now;
      return entry.handle.clone();
    }

    let idle_timeout = self.idle_timeout;
    let before = carts.len();
    carts.retain(|_, entry| now.duration_since(entry.last_touched) <= idle_timeout);
    if carts.len() < before {
      debug!(evicted = before - carts.len(), "Dropped idle carts.");
    }

    debug!(%session, "Creating cart for new session.");
    let handle = CartHandle::new();
    carts.insert(
      session,
      Entry {
        handle: handle.clone(),
        last_touched: now,
      },
    );
    handle
  }

  /// The session's cart if it has one. Never creates an entry.
  pub fn get(&self, session: Uuid) -> Option<CartHandle> {
    self.carts.read().get(&session).map(|e| e.handle.clone())
  }

  pub fn discard(&self, session: Uuid) -> bool {
    self.carts.write().remove(&session).is_some()
  }

  pub fn len(&self) -> usize {
    self.carts.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.carts.read().is_empty()
  }
}
