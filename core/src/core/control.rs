// storefront-core/src/core/control.rs

//! Flow signals returned by handlers and the outcome of a whole run.

/// Returned by a handler to say whether the run goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Skip the remaining handlers of this step and every later step.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran or was legitimately skipped.
  Completed,
  /// A handler of `step` returned `PipelineControl::Stop`.
  Stopped { step: String },
}

impl PipelineResult {
  pub fn is_completed(&self) -> bool {
    matches!(self, PipelineResult::Completed)
  }
}
