// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::{CheckoutRejection, CheckoutRequest};
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, CartSession};

pub async fn quote_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.get(session.0).unwrap_or_default();
  let totals = app_state.checkout.quote(&cart).rounded();
  let policy = app_state.checkout.policy();
  Ok(HttpResponse::Ok().json(json!({
    "totals": totals,
    "itemCount": cart.item_count(),
    "freeShippingThreshold": policy.free_shipping_threshold,
    "currency": app_state.config.currency,
  })))
}

/// Signed-out callers reach the pipeline too; its first step answers with a
/// sign-in redirect that resumes at checkout.
#[instrument(
  name = "handler::checkout",
  skip(app_state, req_payload, user),
  fields(token = %req_payload.checkout_token)
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  user: Option<AuthenticatedUser>,
  session: CartSession,
  req_payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.get(session.0).unwrap_or_default();
  let user_id = user.map(|u| u.user_id);

  match app_state.checkout.submit(user_id, &cart, req_payload.into_inner()).await {
    Ok(receipt) => {
      info!(order_id = %receipt.order.id, "Checkout successful.");
      Ok(HttpResponse::Created().json(json!({
        "message": "Order placed.",
        "orderId": receipt.order.id,
        "order": receipt.order,
        "totals": receipt.totals.rounded(),
        "itemCount": receipt.item_count,
        "addressSaved": receipt.address_saved,
        "replayed": receipt.replayed,
      })))
    }
    Err(rejection) => Ok(rejection_response(rejection)),
  }
}

/// Every failed checkout answers with its cause, the checkout state and the
/// address as submitted, so the form can be shown again unchanged.
fn rejection_response(rejection: CheckoutRejection) -> HttpResponse {
  warn!(error = %rejection.error, "Checkout rejected.");
  let mut body = json!({
    "error": rejection.error.to_string(),
    "checkout": rejection.state,
    "address": rejection.address,
  });
  if let AppError::SignInRequired { resume_at } = &rejection.error {
    body["redirect"] = json!(format!("/signin?next={}", resume_at));
  }
  HttpResponse::build(rejection.error.status_code()).json(body)
}
