// storefront/src/web/routes.rs

use crate::web::handlers::{
  admin_handlers, auth_handlers, cart_handlers, checkout_handlers, order_handlers, product_handlers,
};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/session", web::get().to(auth_handlers::session_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(product_handlers::list_categories_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_item_handler))
          .route("/items/{product_id}", web::put().to(cart_handlers::set_quantity_handler))
          .route("/items/{product_id}", web::delete().to(cart_handlers::remove_item_handler))
          .route("/drawer", web::post().to(cart_handlers::drawer_handler)),
      )
      .service(
        web::scope("/checkout")
          .route("", web::post().to(checkout_handlers::checkout_handler))
          .route("/quote", web::get().to(checkout_handlers::quote_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_my_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_my_order_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/{order_id}", web::get().to(admin_handlers::get_order_handler))
          .route("/orders/{order_id}/status", web::put().to(admin_handlers::set_order_status_handler))
          .route("/users/{user_id}/role", web::put().to(admin_handlers::set_user_role_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route("/products/{product_id}", web::put().to(admin_handlers::update_product_handler))
          .route("/products/{product_id}", web::delete().to(admin_handlers::delete_product_handler))
          .route("/categories/order", web::put().to(admin_handlers::reorder_categories_handler)),
      ),
  );
}
