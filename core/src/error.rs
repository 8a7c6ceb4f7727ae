// storefront-core/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by the engine itself, as opposed to failures raised by
/// handlers. Every pipeline error type must be constructible from this.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for non-optional step '{step_name}' in pipeline '{pipeline}'")]
  HandlerMissing { pipeline: String, step_name: String },

  #[error("Step '{step_name}' in pipeline '{pipeline}' did not finish within {limit:?}")]
  StepTimedOut {
    pipeline: String,
    step_name: String,
    limit: Duration,
  },

  #[error("Error in handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

impl FlowError {
  /// Name of the step the error is attached to, when there is one.
  pub fn step_name(&self) -> Option<&str> {
    match self {
      FlowError::HandlerMissing { step_name, .. } | FlowError::StepTimedOut { step_name, .. } => Some(step_name),
      _ => None,
    }
  }

  pub fn is_timeout(&self) -> bool {
    matches!(self, FlowError::StepTimedOut { .. })
  }
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow error that already wraps a FlowError keeps its variant.
    match err.downcast::<FlowError>() {
      Ok(flow_err) => flow_err,
      Err(other) => FlowError::HandlerError { source: other },
    }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
