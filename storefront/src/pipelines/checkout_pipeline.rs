// storefront/src/pipelines/checkout_pipeline.rs

use crate::cart::CartLine;
use crate::errors::AppError;
use crate::models::{NewOrder, NewOrderItem};
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutState};
use crate::services::pricing::Totals;
use rust_decimal::Decimal;
use std::time::Duration;
use storefront_core::{ContextData, Pipeline, PipelineControl, StepDef};
use tracing::{debug, info, warn};

pub const AUTHORIZE: &str = "authorize";
pub const VALIDATE_ADDRESS: &str = "validate_address";
pub const VALIDATE_CART: &str = "validate_cart";
pub const PRICE_ORDER: &str = "price_order";
pub const RESOLVE_SNAPSHOTS: &str = "resolve_snapshots";
pub const SUBMIT_ORDER: &str = "submit_order";
pub const CLEAR_CART: &str = "clear_cart";
pub const REMEMBER_ADDRESS: &str = "remember_address";

/// Where a signed-out shopper is sent back to after signing in.
pub const CHECKOUT_RESUME_PATH: &str = "/checkout";

/// Builds the checkout pipeline. `submit_timeout` bounds the order write.
pub fn build_checkout_pipeline(submit_timeout: Duration) -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(
    "checkout",
    vec![
      StepDef::required(AUTHORIZE),
      StepDef::required(VALIDATE_ADDRESS),
      StepDef::required(VALIDATE_CART),
      StepDef::required(PRICE_ORDER),
      StepDef::required(RESOLVE_SNAPSHOTS),
      StepDef::required(SUBMIT_ORDER).with_timeout(submit_timeout),
      StepDef::required(CLEAR_CART),
      StepDef::optional(REMEMBER_ADDRESS)
        .skip_if(|ctx: &ContextData<CheckoutCtxData>| !ctx.read().remember_address),
    ],
  );

  // Step 1: only signed-in shoppers can check out.
  p.on_root(AUTHORIZE, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let user_id = ctx_data.read().user_id;
      match user_id {
        Some(user_id) => {
          debug!(%user_id, "Checkout authorized.");
          Ok(PipelineControl::Continue)
        }
        None => {
          info!("Checkout attempted without a signed-in user.");
          Err(AppError::SignInRequired {
            resume_at: CHECKOUT_RESUME_PATH.to_string(),
          })
        }
      }
    })
  });

  // Step 2: every mandatory address field, first failure wins.
  p.on_root(VALIDATE_ADDRESS, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let address = ctx_data.update(|data| {
        data.state = CheckoutState::Validating;
        data.address.clone()
      });
      address.validate()?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: freeze the lines being ordered.
  p.on_root(VALIDATE_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().cart.clone();
      let lines = cart.lines();
      if lines.is_empty() {
        warn!("Checkout rejected: cart is empty.");
        return Err(AppError::EmptyCart);
      }
      debug!(line_count = lines.len(), "Cart lines captured for checkout.");
      ctx_data.write().lines = lines;
      Ok(PipelineControl::Continue)
    })
  });

  // Step 4
  p.on_root(PRICE_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let totals = ctx_data.update(|data| {
        let subtotal: Decimal = data.lines.iter().map(CartLine::subtotal).sum();
        let totals = Totals::compute(subtotal, &data.policy);
        data.totals = Some(totals);
        totals
      });
      info!(
        subtotal = %totals.subtotal,
        shipping = %totals.shipping_fee,
        total = %totals.total,
        "Order priced."
      );
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: one catalog read right before the write, for name/code/image.
  p.on_root(RESOLVE_SNAPSHOTS, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, lines) = ctx_data.update(|data| {
        data.state = CheckoutState::Submitting;
        (data.store.clone(), data.lines.clone())
      });
      let ids: Vec<String> = lines.iter().map(|l| l.product_id.clone()).collect();
      let products = store.products_by_ids(&ids).await?;

      let mut items = Vec::with_capacity(lines.len());
      for line in &lines {
        let product = products
          .iter()
          .find(|p| p.id == line.product_id && p.is_active)
          .ok_or_else(|| AppError::NotFound(format!("Product '{}' is no longer available.", line.name)))?;
        let quantity = i32::try_from(line.quantity)
          .map_err(|_| AppError::Validation(format!("Quantity for '{}' is too large.", line.name)))?;
        items.push(NewOrderItem {
          product_id: line.product_id.clone(),
          product_name: product.name.clone(),
          product_code: product.code.clone(),
          product_image: product.image_url.clone(),
          quantity,
          unit_price: line.unit_price,
          subtotal: line.subtotal(),
        });
      }
      ctx_data.write().items = items;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: order and items in one store call.
  p.on_root(SUBMIT_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, new_order, items) = {
        let data = ctx_data.read();
        let user_id = data.user_id.ok_or_else(|| AppError::SignInRequired {
          resume_at: CHECKOUT_RESUME_PATH.to_string(),
        })?;
        let totals = data
          .totals
          .ok_or_else(|| AppError::Internal("Order must be priced before it is submitted.".to_string()))?;
        let new_order = NewOrder {
          user_id,
          subtotal: totals.subtotal,
          shipping_fee: totals.shipping_fee,
          total: totals.total,
          payment_method: data.payment_method,
          shipping_address: data.address.clone(),
          checkout_token: data.checkout_token,
        };
        (data.store.clone(), new_order, data.items.clone())
      };

      let placed = store.place_order(new_order, items).await?;
      let order = placed.order;
      info!(
        order_id = %order.id,
        user_id = %order.user_id,
        total = %order.total,
        replayed = placed.replayed,
        "Order placed."
      );
      ctx_data.update(|data| {
        data.order = Some(order);
        data.replayed = placed.replayed;
      });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 7: only the ordered units leave the cart, and only once per token.
  p.on_root(CLEAR_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (cart, order_id, lines, replayed) = {
        let data = ctx_data.read();
        (
          data.cart.clone(),
          data.order.as_ref().map(|o| o.id),
          data.lines.clone(),
          data.replayed,
        )
      };
      let order_id = order_id.ok_or_else(|| AppError::Internal("No order recorded for this checkout.".to_string()))?;
      if replayed {
        debug!(%order_id, "Replayed checkout, cart left as is.");
      } else {
        cart.remove_ordered(&lines);
      }
      ctx_data.write().state = CheckoutState::Succeeded { order_id };
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 8 (optional): best effort, the order already stands.
  p.on_root(REMEMBER_ADDRESS, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, user_id, address) = {
        let data = ctx_data.read();
        (data.store.clone(), data.user_id, data.address.clone())
      };
      let Some(user_id) = user_id else {
        return Ok::<_, AppError>(PipelineControl::Continue);
      };
      match store.save_address(user_id, &address).await {
        Ok(()) => {
          debug!(%user_id, "Shipping address saved to profile.");
          ctx_data.write().address_saved = true;
        }
        Err(err) => warn!(%user_id, error = %err, "Could not save shipping address to profile."),
      }
      Ok(PipelineControl::Continue)
    })
  });

  info!("Checkout pipeline built.");
  p
}
