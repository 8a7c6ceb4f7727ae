// storefront-core/src/pipeline/definition.rs

//! `Pipeline<TData, Err>` and the methods that shape its list of steps.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;
use std::time::Duration;

/// An ordered list of named steps over the context data `TData`.
///
/// `Err` is what handlers return and what `run` returns. It must be
/// constructible from [`FlowError`] so that engine failures (missing handlers,
/// elapsed deadlines) surface through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after_hooks: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from its steps. Panics on duplicate step names.
  pub fn new(name: impl Into<String>, steps: Vec<StepDef<TData>>) -> Self {
    let mut pipeline = Self {
      name: name.into(),
      steps: Vec::with_capacity(steps.len()),
      before_hooks: HashMap::new(),
      on_hooks: HashMap::new(),
      after_hooks: HashMap::new(),
    };
    for step in steps {
      pipeline.ensure_step_not_exists(&step.name);
      pipeline.steps.push(step);
    }
    pipeline
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn step(&self, step_name: &str) -> Option<&StepDef<TData>> {
    self.steps.iter().find(|s| s.name == step_name)
  }

  /// Panics if `step_name` is unknown. A typo in a step name is a setup bug,
  /// not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline setup error: step '{}' not found in pipeline '{}'.",
        step_name, self.name
      );
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline setup error: step '{}' already exists in pipeline '{}'.",
        step_name, self.name
      );
    }
  }

  fn step_mut(&mut self, step_name: &str) -> &mut StepDef<TData> {
    self.ensure_step_exists(step_name);
    match self.steps.iter_mut().find(|s| s.name == step_name) {
      Some(step) => step,
      None => unreachable!("ensure_step_exists checked '{}'", step_name),
    }
  }

  pub fn insert_after_step(&mut self, existing_step_name: &str, step: StepDef<TData>) {
    self.ensure_step_exists(existing_step_name);
    self.ensure_step_not_exists(&step.name);
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step_name)
      .unwrap_or(self.steps.len() - 1);
    self.steps.insert(idx + 1, step);
  }

  /// Removes a step and every handler attached to it. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.before_hooks.remove(step_name);
      self.on_hooks.remove(step_name);
      self.after_hooks.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    self.step_mut(step_name).optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.step_mut(step_name).skip_if = skip_if;
  }

  pub fn set_timeout(&mut self, step_name: &str, timeout: Option<Duration>) {
    self.step_mut(step_name).timeout = timeout;
  }
}
