// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderWithItems;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

pub async fn list_my_orders_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.orders_for_user(user.user_id).await?;
  Ok(HttpResponse::Ok().json(orders))
}

/// Another user's order answers 404, same as a missing one.
pub async fn get_my_order_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = match app_state.store.get_order(order_id).await? {
    Some(order) if order.user_id == user.user_id => order,
    _ => return Err(AppError::NotFound(format!("Order {}", order_id))),
  };
  let items = app_state.store.order_items(order_id).await?;
  Ok(HttpResponse::Ok().json(OrderWithItems { order, items }))
}
