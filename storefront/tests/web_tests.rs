// tests/web_tests.rs
mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::store::MemoryStore;
use storefront::web::{configure_app_routes, json_config};
use uuid::Uuid;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state))
        .app_data(json_config())
        .configure(configure_app_routes),
    )
    .await
  };
}

fn decimal(value: &Value) -> Decimal {
  value.as_str().expect("decimal as string").parse().expect("valid decimal")
}

macro_rules! sign_up {
  ($app:expr, $email:expr) => {{
    let req = test::TestRequest::post()
      .uri("/api/v1/auth/signup")
      .set_json(json!({ "email": $email, "password": "secret1" }))
      .to_request();
    let resp = test::call_service(&$app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();
    let user_id: Uuid = body["userId"].as_str().unwrap().parse().unwrap();
    (token, user_id)
  }};
}

#[actix_web::test]
async fn test_health() {
  setup_tracing();
  let app = init_app!(app_state(Arc::new(MemoryStore::new())));
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_cart_requires_session_header() {
  setup_tracing();
  let app = init_app!(app_state(seeded_store().await));
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/cart").to_request()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_cart_edits_over_http() {
  setup_tracing();
  let app = init_app!(app_state(seeded_store().await));
  let cart_session = Uuid::new_v4().to_string();

  for _ in 0..2 {
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(("X-Cart-Session", cart_session.as_str()))
      .set_json(json!({ "product_id": "A" }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }

  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["item_count"], 2);
  assert_eq!(body["drawer_open"], true);
  assert_eq!(body["lines"].as_array().unwrap().len(), 1);
  assert_eq!(decimal(&body["totals"]["subtotal"]), Decimal::from(200));
  assert_eq!(decimal(&body["totals"]["shipping_fee"]), Decimal::from(50));
  assert_eq!(decimal(&body["totals"]["total"]), Decimal::from(250));

  let req = test::TestRequest::put()
    .uri("/api/v1/cart/items/A")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .set_json(json!({ "quantity": -4 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["item_count"], 1);

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .set_json(json!({ "product_id": "nope" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

  let other_session = Uuid::new_v4().to_string();
  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(("X-Cart-Session", other_session.as_str()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["item_count"], 0);
}

#[actix_web::test]
async fn test_signed_out_checkout_redirects_to_sign_in() {
  setup_tracing();
  let app = init_app!(app_state(seeded_store().await));
  let cart_session = Uuid::new_v4().to_string();

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .set_json(json!({ "product_id": "B" }))
    .to_request();
  test::call_service(&app, req).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .set_json(json!({ "address": sample_address(), "checkout_token": Uuid::new_v4() }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["redirect"], "/signin?next=/checkout");
}

#[actix_web::test]
async fn test_sign_up_then_checkout_and_list_orders() {
  setup_tracing();
  let store = seeded_store().await;
  let app = init_app!(app_state(store.clone()));
  let (token, _) = sign_up!(app, "shopper@example.com");
  let bearer = format!("Bearer {}", token);
  let cart_session = Uuid::new_v4().to_string();

  for id in ["A", "C"] {
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(("X-Cart-Session", cart_session.as_str()))
      .set_json(json!({ "product_id": id }))
      .to_request();
    test::call_service(&app, req).await;
  }

  let mut address = sample_address();
  address.city = String::new();
  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .insert_header(("Authorization", bearer.as_str()))
    .set_json(json!({ "address": address, "checkout_token": Uuid::new_v4() }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Validation Error: City is required.");
  assert_eq!(body["checkout"]["state"], "failed");
  assert_eq!(body["address"]["phone"], "9800000000");

  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .insert_header(("Authorization", bearer.as_str()))
    .set_json(json!({
      "address": sample_address(),
      "payment_method": "upi",
      "checkout_token": Uuid::new_v4(),
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  let order_id = body["orderId"].as_str().unwrap().to_string();
  assert_eq!(decimal(&body["totals"]["total"]), Decimal::from(700));
  assert_eq!(body["order"]["payment_method"], "upi");
  assert_eq!(store.order_count(), 1);

  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .to_request();
  let cart: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(cart["item_count"], 0);

  let req = test::TestRequest::get()
    .uri("/api/v1/orders")
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let orders: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(orders.as_array().unwrap().len(), 1);

  let req = test::TestRequest::get()
    .uri(&format!("/api/v1/orders/{}", order_id))
    .insert_header(("Authorization", bearer.as_str()))
    .to_request();
  let detail: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(detail["items"].as_array().unwrap().len(), 2);

  let (other_token, _) = sign_up!(app, "other@example.com");
  let req = test::TestRequest::get()
    .uri(&format!("/api/v1/orders/{}", order_id))
    .insert_header(("Authorization", format!("Bearer {}", other_token)))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_routes_check_role() {
  setup_tracing();
  let app = init_app!(app_state(seeded_store().await));
  let (customer_token, customer_id) = sign_up!(app, "customer@example.com");
  let (admin_token, admin_id) = sign_up!(app, "admin@shop.test");

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders")
    .insert_header(("Authorization", format!("Bearer {}", customer_token)))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let req = test::TestRequest::get().uri("/api/v1/admin/orders").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let admin_bearer = format!("Bearer {}", admin_token);
  let req = test::TestRequest::post()
    .uri("/api/v1/admin/products")
    .insert_header(("Authorization", admin_bearer.as_str()))
    .set_json(json!({ "name": "Scarf", "code": "SCF-1", "price": "45.50" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let product: Value = test::read_body_json(resp).await;
  assert_eq!(product["is_active"], true);

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/users/{}/role", customer_id))
    .insert_header(("Authorization", admin_bearer.as_str()))
    .set_json(json!({ "role": "admin" }))
    .to_request();
  let profile: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(profile["role"], "admin");

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/users/{}/role", admin_id))
    .insert_header(("Authorization", admin_bearer.as_str()))
    .set_json(json!({ "role": "customer" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  // The promoted customer now passes the admin check.
  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders")
    .insert_header(("Authorization", format!("Bearer {}", customer_token)))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_reading_a_cart_does_not_register_it() {
  setup_tracing();
  let state = app_state(seeded_store().await);
  let carts = state.carts.clone();
  let app = init_app!(state);

  for path in ["/api/v1/cart", "/api/v1/checkout/quote"] {
    let req = test::TestRequest::get()
      .uri(path)
      .insert_header(("X-Cart-Session", Uuid::new_v4().to_string()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }
  let req = test::TestRequest::delete()
    .uri("/api/v1/cart/items/A")
    .insert_header(("X-Cart-Session", Uuid::new_v4().to_string()))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["item_count"], 0);

  assert!(carts.is_empty());
}

#[actix_web::test]
async fn test_failed_order_write_returns_cause_and_address() {
  setup_tracing();
  let store = seeded_store().await;
  let app = init_app!(app_state(store.clone()));
  let (token, _) = sign_up!(app, "shopper@example.com");
  let cart_session = Uuid::new_v4().to_string();

  let req = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .set_json(json!({ "product_id": "A" }))
    .to_request();
  test::call_service(&app, req).await;

  store.set_fail_writes(true);
  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .insert_header(("Authorization", format!("Bearer {}", token)))
    .set_json(json!({ "address": sample_address(), "checkout_token": Uuid::new_v4() }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("place_order"));
  assert_eq!(body["checkout"]["state"], "failed");
  assert_eq!(body["address"]["city"], "Pune");

  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(("X-Cart-Session", cart_session.as_str()))
    .to_request();
  let cart: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(cart["item_count"], 1);
}
