// storefront-core/src/core/step.rs

use super::ContextData;
use std::sync::Arc;
use std::time::Duration;

/// Predicate evaluated right before a step; `true` skips the step entirely.
pub type SkipCondition<TData> = Arc<dyn Fn(&ContextData<TData>) -> bool + Send + Sync + 'static>;

/// One named step of a pipeline.
#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  /// Optional steps may be left without handlers.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
  /// Upper bound for all handlers of the step together.
  pub timeout: Option<Duration>,
}

impl<TData: 'static + Send + Sync> StepDef<TData> {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
      skip_if: None,
      timeout: None,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      optional: true,
      ..Self::required(name)
    }
  }

  pub fn skip_if(mut self, condition: impl Fn(&ContextData<TData>) -> bool + Send + Sync + 'static) -> Self {
    self.skip_if = Some(Arc::new(condition));
    self
  }

  pub fn with_timeout(mut self, limit: Duration) -> Self {
    self.timeout = Some(limit);
    self
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .field("timeout", &self.timeout)
      .finish()
  }
}
