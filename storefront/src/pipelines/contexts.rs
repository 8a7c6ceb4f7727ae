// storefront/src/pipelines/contexts.rs

//! Data the checkout pipeline runs over. Handlers receive it wrapped in
//! `storefront_core::ContextData`.

use crate::cart::{CartHandle, CartLine};
use crate::models::{NewOrderItem, Order, PaymentMethod, ShippingAddress};
use crate::services::pricing::{ShippingPolicy, Totals};
use crate::store::DataStore;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
  #[default]
  Idle,
  Validating,
  Submitting,
  Succeeded {
    order_id: Uuid,
  },
  Failed {
    reason: String,
  },
}

impl CheckoutState {
  pub fn is_terminal(&self) -> bool {
    matches!(self, CheckoutState::Succeeded { .. } | CheckoutState::Failed { .. })
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub store: Arc<dyn DataStore>,
  pub policy: ShippingPolicy,
  pub cart: CartHandle,

  // Input
  pub user_id: Option<Uuid>,
  pub address: ShippingAddress,
  pub payment_method: PaymentMethod,
  pub checkout_token: Uuid,
  pub remember_address: bool,

  // Populated by the steps
  pub state: CheckoutState,
  pub lines: Vec<CartLine>,
  pub totals: Option<Totals>,
  pub items: Vec<NewOrderItem>,
  pub order: Option<Order>,
  /// The checkout token had already produced `order`.
  pub replayed: bool,
  pub address_saved: bool,
}

impl CheckoutCtxData {
  pub fn new(store: Arc<dyn DataStore>, policy: ShippingPolicy, cart: CartHandle) -> Self {
    Self {
      store,
      policy,
      cart,
      user_id: None,
      address: ShippingAddress::default(),
      payment_method: PaymentMethod::default(),
      checkout_token: Uuid::new_v4(),
      remember_address: false,
      state: CheckoutState::Idle,
      lines: Vec::new(),
      totals: None,
      items: Vec::new(),
      order: None,
      replayed: false,
      address_saved: false,
    }
  }
}
