// storefront/src/services/checkout_service.rs

//! The checkout assembler: turns a cart and a shipping address into exactly
//! one order.

use crate::cart::CartHandle;
use crate::errors::AppError;
use crate::models::{Order, PaymentMethod, ShippingAddress};
use crate::pipelines::{build_checkout_pipeline, CheckoutCtxData, CheckoutState};
use crate::services::pricing::{ShippingPolicy, Totals};
use crate::store::DataStore;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{ContextData, Pipeline, PipelineResult};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
  pub address: ShippingAddress,
  #[serde(default)]
  pub payment_method: PaymentMethod,
  /// Client-generated; resubmitting with the same token never creates a second order.
  pub checkout_token: Uuid,
  #[serde(default)]
  pub remember_address: bool,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
  pub order: Order,
  pub totals: Totals,
  pub item_count: usize,
  pub address_saved: bool,
  /// An earlier submit with the same token already placed this order.
  pub replayed: bool,
}

/// A failed checkout. The cart is untouched and the submitted address is
/// handed back so the form can be shown again as entered.
#[derive(Debug)]
pub struct CheckoutRejection {
  pub error: AppError,
  pub address: ShippingAddress,
  pub state: CheckoutState,
}

pub struct CheckoutAssembler {
  pipeline: Arc<Pipeline<CheckoutCtxData, AppError>>,
  store: Arc<dyn DataStore>,
  policy: ShippingPolicy,
}

impl CheckoutAssembler {
  pub fn new(store: Arc<dyn DataStore>, policy: ShippingPolicy, submit_timeout: Duration) -> Self {
    Self {
      pipeline: Arc::new(build_checkout_pipeline(submit_timeout)),
      store,
      policy,
    }
  }

  pub fn policy(&self) -> &ShippingPolicy {
    &self.policy
  }

  pub fn pipeline(&self) -> &Pipeline<CheckoutCtxData, AppError> {
    &self.pipeline
  }

  /// Totals for the cart as it is now. Writes nothing.
  pub fn quote(&self, cart: &CartHandle) -> Totals {
    Totals::for_cart(&cart.read(), &self.policy)
  }

  #[instrument(
    name = "checkout::submit",
    skip_all,
    fields(user_id = ?user_id, token = %request.checkout_token)
  )]
  pub async fn submit(
    &self,
    user_id: Option<Uuid>,
    cart: &CartHandle,
    request: CheckoutRequest,
  ) -> Result<CheckoutReceipt, CheckoutRejection> {
    let mut initial = CheckoutCtxData::new(self.store.clone(), self.policy, cart.clone());
    initial.user_id = user_id;
    initial.address = request.address;
    initial.payment_method = request.payment_method;
    initial.checkout_token = request.checkout_token;
    initial.remember_address = request.remember_address;
    let ctx_data = ContextData::new(initial);

    let outcome = self.pipeline.run(ctx_data.clone()).await;

    let mut data = ctx_data.write();
    let error = match outcome {
      Ok(PipelineResult::Completed) => match (data.order.take(), data.totals) {
        (Some(order), Some(totals)) => {
          info!(order_id = %order.id, "Checkout succeeded.");
          return Ok(CheckoutReceipt {
            order,
            totals,
            item_count: data.items.len(),
            address_saved: data.address_saved,
            replayed: data.replayed,
          });
        }
        _ => AppError::Internal("Checkout completed without an order.".to_string()),
      },
      Ok(PipelineResult::Stopped { step }) => {
        error!(%step, "Checkout pipeline stopped without an outcome.");
        AppError::Internal(format!("Checkout halted at step '{}'.", step))
      }
      Err(err) => err,
    };

    if error.is_validation() || matches!(error, AppError::SignInRequired { .. }) {
      info!(error = %error, "Checkout rejected.");
    } else {
      warn!(error = %error, "Checkout failed.");
    }
    data.state = CheckoutState::Failed {
      reason: error.to_string(),
    };
    Err(CheckoutRejection {
      error,
      address: data.address.clone(),
      state: data.state.clone(),
    })
  }
}
