// storefront/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{NewProduct, OrderStatus, ProductUpdate, Role};
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct OrderStatusPayload {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug)]
pub struct RolePayload {
  pub role: Role,
}

#[derive(Deserialize, Debug)]
pub struct ReorderPayload {
  pub from: usize,
  pub to: usize,
}

pub async fn list_orders_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.admin.list_orders().await?))
}

pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.admin.order_with_items(path.into_inner()).await?))
}

#[instrument(name = "handler::admin_order_status", skip(app_state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn set_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<OrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .admin
    .set_order_status(path.into_inner(), req_payload.status)
    .await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::admin_user_role", skip(app_state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn set_user_role_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<RolePayload>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  if user_id == admin.0.user_id && req_payload.role != Role::Admin {
    return Err(AppError::Validation("Admins cannot remove their own admin role.".to_string()));
  }
  let profile = app_state.admin.set_user_role(user_id, req_payload.role).await?;
  Ok(HttpResponse::Ok().json(profile))
}

pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.admin.create_product(req_payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(product))
}

pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<String>,
  req_payload: web::Json<ProductUpdate>,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .admin
    .update_product(&path.into_inner(), req_payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  app_state.admin.delete_product(&path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

pub async fn reorder_categories_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<ReorderPayload>,
) -> Result<HttpResponse, AppError> {
  let list = app_state.admin.category_list().await?;
  app_state
    .admin
    .reorder_categories(&list, req_payload.from, req_payload.to)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": list.snapshot() })))
}
