// storefront-core/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers.
//!
//! Each registration accepts any closure `Fn(ContextData<TData>) -> Future`
//! whose error converts into the pipeline's `Err`, and boxes it into a
//! uniform [`Handler`].

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::core::handler::Handler;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use std::future::Future;
use tracing::{event, Level};

#[derive(Debug, Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

fn boxed_handler<TData, Err, F, UserErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
{
  let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  });
  handler
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn push_hook(&mut self, phase: Phase, step_name: &str, handler: Handler<TData, Err>) {
    self.ensure_step_exists(step_name);
    let hooks = match phase {
      Phase::Before => &mut self.before_hooks,
      Phase::On => &mut self.on_hooks,
      Phase::After => &mut self.after_hooks,
    };
    hooks.entry(step_name.to_string()).or_default().push(handler);
    event!(Level::TRACE, pipeline = %self.name, %step_name, ?phase, "Handler registered.");
  }

  /// Registers a handler that runs before the step's `on` handlers.
  pub fn before_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::Before, step_name, boxed_handler(handler_fn));
  }

  /// Registers the main work of a step. Several handlers run in order.
  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::On, step_name, boxed_handler(handler_fn));
  }

  /// Registers a handler that runs once the step's `on` handlers are done.
  pub fn after_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::After, step_name, boxed_handler(handler_fn));
  }
}
