// tests/context_management_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use storefront_core::{ContextData, Pipeline, PipelineResult, SkipCondition, StepDef};

#[test]
fn test_context_data_clones_share_state() {
  let ctx = ContextData::new(TestContext::default());
  let other = ctx.clone();
  other.write().counter = 41;
  ctx.update(|d| d.counter += 1);

  assert_eq!(ctx.read().counter, 42);
  assert!(ctx.same_as(&other));
  assert!(!ctx.same_as(&ContextData::new(TestContext::default())));
  assert_eq!(*ctx.map_read(|d| &d.counter), 42);
  assert_eq!(ctx.snapshot().counter, 42);
}

#[tokio::test]
#[serial]
async fn test_structural_edits() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new("edits", vec![StepDef::required("first"), StepDef::required("last")]);
  pipeline.insert_after_step("first", StepDef::required("middle"));
  assert_eq!(pipeline.step_names(), vec!["first", "middle", "last"]);

  pipeline.on_root("first", create_simple_handler("first", "1"));
  pipeline.on_root("middle", create_failing_handler("middle", "removed later"));
  pipeline.on_root("last", create_simple_handler("last", "3"));

  pipeline.remove_step("middle");
  pipeline.remove_step("does_not_exist");
  assert_eq!(pipeline.step_names(), vec!["first", "last"]);

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().message, "13");
}

#[tokio::test]
#[serial]
async fn test_set_optional_and_skip_condition() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new("toggles", vec![StepDef::required("main"), StepDef::required("extra")]);
  pipeline.on_root("main", create_simple_handler("main", "m"));

  pipeline.set_optional("extra", true);
  assert!(pipeline.step("extra").map(|s| s.optional).unwrap_or(false));
  assert!(pipeline.run(ContextData::new(TestContext::default())).await.is_ok());

  pipeline.set_optional("extra", false);
  let after_main: SkipCondition<TestContext> = Arc::new(|ctx: &ContextData<TestContext>| ctx.read().counter > 0);
  pipeline.set_skip_condition("extra", Some(after_main));
  let ctx = ContextData::new(TestContext::default());
  assert!(pipeline.run(ctx.clone()).await.is_ok());
  assert_eq!(ctx.read().steps_executed, vec!["main"]);

  pipeline.set_skip_condition("extra", None);
  assert!(pipeline.run(ContextData::new(TestContext::default())).await.is_err());
  assert_eq!(pipeline.name(), "toggles");
}
