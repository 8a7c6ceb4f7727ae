// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Your cart is empty.")]
  EmptyCart,

  /// The caller must sign in first; `resume_at` is where the flow picks up afterwards.
  #[error("Sign in required to continue to {resume_at}")]
  SignInRequired { resume_at: String },

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// The request clashes with something already recorded, e.g. a reused checkout token.
  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Timed out: {0}")]
  Timeout(String),

  #[error("Workflow Error: {source}")]
  Workflow { source: FlowError },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Errors the user can fix by editing what they entered.
  pub fn is_validation(&self) -> bool {
    matches!(self, AppError::Validation(_) | AppError::EmptyCart)
  }
}

impl From<FlowError> for AppError {
  fn from(err: FlowError) -> Self {
    match err {
      FlowError::StepTimedOut { step_name, limit, .. } => {
        AppError::Timeout(format!("step '{}' exceeded {:?}", step_name, limit))
      }
      // Handlers that went through anyhow may still carry one of ours.
      FlowError::HandlerError { source } => match source.downcast::<AppError>() {
        Ok(app_err) => app_err,
        Err(other) => AppError::Workflow {
          source: FlowError::HandlerError { source: other },
        },
      },
      other => AppError::Workflow { source: other },
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::EmptyCart => StatusCode::BAD_REQUEST,
      AppError::SignInRequired { .. } | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::EmptyCart => HttpResponse::BadRequest().json(json!({"error": self.to_string()})),
      AppError::SignInRequired { resume_at } => HttpResponse::Unauthorized().json(json!({
        "error": "Sign in required",
        "redirect": format!("/signin?next={}", resume_at),
      })),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Timeout(m) => {
        HttpResponse::GatewayTimeout().json(json!({"error": "The store did not answer in time", "detail": m}))
      }
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[test]
  fn step_timeout_becomes_timeout() {
    let err = AppError::from(FlowError::StepTimedOut {
      pipeline: "checkout".to_string(),
      step_name: "submit_order".to_string(),
      limit: Duration::from_secs(1),
    });
    assert!(matches!(err, AppError::Timeout(_)));
    assert_eq!(err.error_response().status(), StatusCode::GATEWAY_TIMEOUT);
  }

  #[test]
  fn reused_token_is_a_conflict() {
    let err = AppError::Conflict("token".to_string());
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert!(!err.is_validation());
  }

  #[test]
  fn anyhow_keeps_app_error() {
    let err = AppError::from(anyhow::Error::new(AppError::NotFound("order".to_string())));
    assert!(matches!(err, AppError::NotFound(_)));

    let err = AppError::from(FlowError::HandlerError {
      source: anyhow::Error::new(AppError::EmptyCart),
    });
    assert!(matches!(err, AppError::EmptyCart));
  }

  #[test]
  fn status_codes() {
    let cases = [
      (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
      (AppError::EmptyCart, StatusCode::BAD_REQUEST),
      (
        AppError::SignInRequired {
          resume_at: "/checkout".into(),
        },
        StatusCode::UNAUTHORIZED,
      ),
      (AppError::Auth("x".into()), StatusCode::UNAUTHORIZED),
      (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
      (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
      (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(err.error_response().status(), status, "{}", err);
      assert_eq!(err.status_code(), status, "{}", err);
    }
  }
}
