// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::catalog::{Listing, SortKey, DEFAULT_PER_PAGE};
use crate::errors::AppError;
use crate::models::{Category, Subcategory};
use crate::state::AppState;
use crate::store::ProductQuery;

#[derive(Deserialize, Debug, Default)]
pub struct ProductListParams {
  pub search: Option<String>,
  pub category: Option<Uuid>,
  pub subcategory: Option<Uuid>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
  #[serde(default)]
  pub sort: SortKey,
  pub page: Option<usize>,
  pub per_page: Option<usize>,
}

#[derive(Serialize, Debug)]
pub struct CategoryView {
  #[serde(flatten)]
  pub category: Category,
  pub subcategories: Vec<Subcategory>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  params: web::Query<ProductListParams>,
) -> Result<HttpResponse, AppError> {
  let params = params.into_inner();
  if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
    if min > max {
      return Err(AppError::Validation("min_price cannot exceed max_price.".to_string()));
    }
  }
  let query = ProductQuery {
    category_id: params.category,
    subcategory_id: params.subcategory,
    min_price: params.min_price,
    max_price: params.max_price,
    order: params.sort,
    ..ProductQuery::active()
  };
  let products = app_state.store.list_products(&query).await?;
  debug!(matched = products.len(), "Store returned products.");

  let listing = Listing {
    search: params.search,
    sort: params.sort,
    page: params.page.unwrap_or(1),
    per_page: params.per_page.unwrap_or(DEFAULT_PER_PAGE),
  };
  Ok(HttpResponse::Ok().json(listing.apply(products)))
}

pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.store.get_product(&product_id).await? {
    Some(product) if product.is_active => Ok(HttpResponse::Ok().json(product)),
    _ => Err(AppError::NotFound(format!("Product '{}'", product_id))),
  }
}

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.store.list_categories().await?;
  let subcategories = app_state.store.list_subcategories(None).await?;

  let views: Vec<CategoryView> = categories
    .into_iter()
    .map(|category| CategoryView {
      subcategories: subcategories
        .iter()
        .filter(|s| s.category_id == category.id)
        .cloned()
        .collect(),
      category,
    })
    .collect();
  Ok(HttpResponse::Ok().json(views))
}
