// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::cart::{Cart, CartLine};
use crate::errors::AppError;
use crate::services::{ShippingPolicy, Totals};
use crate::state::AppState;
use crate::web::extractors::CartSession;

#[derive(Serialize, Debug)]
pub struct CartView {
  pub lines: Vec<CartLine>,
  pub item_count: u64,
  pub drawer_open: bool,
  pub totals: Totals,
}

impl CartView {
  pub fn new(cart: &Cart, policy: &ShippingPolicy) -> Self {
    Self {
      lines: cart.lines().to_vec(),
      item_count: cart.item_count(),
      drawer_open: cart.drawer_open(),
      totals: Totals::for_cart(cart, policy).rounded(),
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
  pub product_id: String,
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityPayload {
  pub quantity: i64,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DrawerAction {
  #[default]
  Toggle,
  Open,
  Close,
}

#[derive(Deserialize, Debug, Default)]
pub struct DrawerPayload {
  #[serde(default)]
  pub action: DrawerAction,
}

/// Sessions without a cart see an empty one; nothing is registered for them.
fn cart_response(app_state: &AppState, session: CartSession) -> HttpResponse {
  let cart = app_state
    .carts
    .get(session.0)
    .map(|handle| handle.snapshot())
    .unwrap_or_default();
  HttpResponse::Ok().json(CartView::new(&cart, app_state.checkout.policy()))
}

pub async fn view_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  Ok(cart_response(&app_state, session))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload),
  fields(product_id = %req_payload.product_id)
)]
pub async fn add_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  req_payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
  let product = match app_state.store.get_product(&req_payload.product_id).await? {
    Some(product) if product.is_active => product,
    _ => return Err(AppError::NotFound(format!("Product '{}'", req_payload.product_id))),
  };
  let cart = app_state.carts.handle(session.0);
  cart.add_item(&product);
  info!(cart_items = cart.item_count(), "Item added to cart.");
  Ok(cart_response(&app_state, session))
}

pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  path: web::Path<String>,
  req_payload: web::Json<SetQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  if let Some(cart) = app_state.carts.get(session.0) {
    cart.set_quantity(&path.into_inner(), req_payload.quantity);
  }
  Ok(cart_response(&app_state, session))
}

pub async fn remove_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  if let Some(cart) = app_state.carts.get(session.0) {
    cart.remove_item(&path.into_inner());
  }
  Ok(cart_response(&app_state, session))
}

pub async fn clear_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  if let Some(cart) = app_state.carts.get(session.0) {
    cart.clear();
  }
  Ok(cart_response(&app_state, session))
}

pub async fn drawer_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  req_payload: Option<web::Json<DrawerPayload>>,
) -> Result<HttpResponse, AppError> {
  let action = req_payload.map(|p| p.action).unwrap_or_default();
  let cart = app_state.carts.handle(session.0);
  match action {
    DrawerAction::Toggle => cart.toggle_drawer(),
    DrawerAction::Open => cart.open_drawer(),
    DrawerAction::Close => cart.close_drawer(),
  }
  Ok(cart_response(&app_state, session))
}
