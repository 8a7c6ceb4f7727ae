// storefront/src/web/extractors.rs

//! Request extractors for the bearer session, the admin role and the cart session.

use crate::errors::AppError;
use crate::models::Role;
use crate::state::AppState;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;
use uuid::Uuid;

pub const CART_SESSION_HEADER: &str = "X-Cart-Session";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub email: String,
  pub token: String,
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
  req
    .headers()
    .get(actix_web::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let token = bearer_token(req).ok_or_else(|| {
    AppError::Auth("User authentication required. Missing or malformed bearer token.".to_string())
  })?;
  let session = app_state(req)?.identity.session(token).ok_or_else(|| {
    warn!("AuthenticatedUser extractor: unknown or expired session token.");
    AppError::Auth("Session is invalid or has ended.".to_string())
  })?;
  Ok(AuthenticatedUser {
    user_id: session.user_id,
    email: session.email,
    token: session.token,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// A signed-in user whose profile carries the admin role. The role is read
/// from the store on every request, so a demotion takes effect immediately.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let user = authenticate(req);
    let state = app_state(req).map(|s| s.clone());
    Box::pin(async move {
      let user = user?;
      let state = state?;
      match state.identity.role_of(user.user_id).await? {
        Role::Admin => Ok(AdminUser(user)),
        Role::Customer => {
          warn!(user_id = %user.user_id, "Non-admin user attempted an admin operation.");
          Err(AppError::Forbidden("Administrator role required.".to_string()))
        }
      }
    })
  }
}

/// The browser session key a cart is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSession(pub Uuid);

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let parsed = req
      .headers()
      .get(CART_SESSION_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| Uuid::parse_str(v.trim()).ok())
      .map(CartSession)
      .ok_or_else(|| AppError::Validation(format!("A valid {} header is required.", CART_SESSION_HEADER)));
    ready(parsed)
  }
}
