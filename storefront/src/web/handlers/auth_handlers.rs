// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::Session;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CredentialsPayload {
  pub email: String,
  pub password: String,
}

fn session_body(session: &Session) -> serde_json::Value {
  json!({
    "userId": session.user_id,
    "email": session.email,
    "token": session.token,
  })
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let session = app_state
    .identity
    .sign_up(&req_payload.email, &req_payload.password)
    .await?;
  let role = app_state.identity.role_of(session.user_id).await?;
  info!(user_id = %session.user_id, "Signup successful.");

  let mut body = session_body(&session);
  body["message"] = json!("User created successfully.");
  body["role"] = json!(role);
  Ok(HttpResponse::Created().json(body))
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let session = app_state
    .identity
    .sign_in(&req_payload.email, &req_payload.password)
    .await?;
  let role = app_state.identity.role_of(session.user_id).await?;

  let mut body = session_body(&session);
  body["message"] = json!("Signin successful.");
  body["role"] = json!(role);
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(name = "handler::signout", skip_all, fields(user_id = %user.user_id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.identity.sign_out(&user.token).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out." })))
}

/// Current session, or `null` when the request carries none.
pub async fn session_handler(
  app_state: web::Data<AppState>,
  user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let Some(user) = user else {
    return Ok(HttpResponse::Ok().json(json!({ "session": null })));
  };
  let role = app_state.identity.role_of(user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "session": {
      "userId": user.user_id,
      "email": user.email,
      "role": role,
    }
  })))
}
