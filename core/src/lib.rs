// storefront-core/src/lib.rs

//! A small asynchronous step-pipeline engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that operate on a shared, lockable
//! [`ContextData`]. Handlers decide whether the run continues or stops, and
//! any handler error aborts the run and is returned to the caller.
//!
//! Steps may be optional, may be skipped by a predicate evaluated against the
//! context, and may be bounded by a deadline. The storefront checkout is
//! written as one of these pipelines so that each phase of order assembly is
//! a named, traceable unit.
//!
//! ```ignore
//! let mut p = Pipeline::<MyData, MyError>::new(
//!   "example",
//!   vec![StepDef::required("load"), StepDef::optional("notify")],
//! );
//! p.on_root("load", |ctx: ContextData<MyData>| Box::pin(async move {
//!   ctx.write().loaded = true;
//!   Ok::<_, MyError>(PipelineControl::Continue)
//! }));
//! let outcome = p.run(ContextData::new(MyData::default())).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};
