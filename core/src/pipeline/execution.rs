// storefront-core/src/pipeline/execution.rs

//! `Pipeline::run`: walks the steps in order and drives their handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tokio::time::Instant;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Per step: the skip condition is checked, then `before`, `on` and `after`
  /// handlers run in registration order. The first `Stop` ends the run with
  /// `PipelineResult::Stopped`; the first error ends it with that error.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline = %self.name,
            context_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = %step_def.name,
        step_index = step_idx,
        optional = step_def.optional
      );

      match self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        PipelineControl::Continue => {}
        PipelineControl::Stop => {
          event!(Level::INFO, step = %step_def.name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped {
            step: step_def.name.clone(),
          });
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond) = &step_def.skip_if {
      if skip_cond(ctx_data) {
        event!(Level::INFO, "Step skipped by its skip condition.");
        return Ok(PipelineControl::Continue);
      }
    }

    let phases: [(&'static str, Option<&Vec<Handler<TData, Err>>>); 3] = [
      ("before", self.before_hooks.get(step_name)),
      ("on", self.on_hooks.get(step_name)),
      ("after", self.after_hooks.get(step_name)),
    ];

    let has_handlers = phases.iter().any(|(_, hs)| hs.map_or(false, |v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        pipeline: self.name.clone(),
        step_name: step_def.name.clone(),
      }));
    }

    // One deadline covers every phase of the step.
    let deadline = step_def.timeout.map(|limit| (Instant::now() + limit, limit));

    for (phase, handlers) in phases {
      let Some(handlers) = handlers else { continue };
      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        event!(Level::TRACE, phase, handler_index = handler_idx, "Executing handler.");
        let fut = handler_fn(ctx_data.clone());
        let outcome = match deadline {
          Some((at, limit)) => match tokio::time::timeout_at(at, fut).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => {
              event!(Level::ERROR, phase, ?limit, "Step deadline elapsed.");
              return Err(Err::from(FlowError::StepTimedOut {
                pipeline: self.name.clone(),
                step_name: step_def.name.clone(),
                limit,
              }));
            }
          },
          None => fut.await,
        };

        match outcome {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
          Err(e) => {
            event!(Level::ERROR, phase, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Step finished.");
    Ok(PipelineControl::Continue)
  }
}
