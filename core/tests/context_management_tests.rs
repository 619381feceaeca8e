// tests/context_management_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::time::Duration;
use stockflow::{ContextData, Pipeline, PipelineControl, PipelineResult};

// Handlers copy what they need out of the guard, await the "store", then write back.
#[tokio::test]
#[serial]
async fn test_handler_awaits_between_read_and_write() {
  setup_tracing();
  let mut pipeline = Pipeline::<AdjustmentCtx, AdjustmentError>::new(&[("reserve", false, None)]);
  pipeline.on_root("reserve", |ctx: ContextData<AdjustmentCtx>| {
    Box::pin(async move {
      let requested = ctx.read().requested.unwrap_or_default();
      tokio::time::sleep(Duration::from_millis(2)).await;
      let mut guard = ctx.write();
      guard.on_hand -= requested;
      guard.journal.push("reserve");
      Ok::<_, AdjustmentError>(PipelineControl::Continue)
    })
  });

  let ctx = ContextData::new(AdjustmentCtx::requesting(9, 4));
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().on_hand, 5);
}

// One pipeline serves many requests, each with its own context.
#[tokio::test]
#[serial]
async fn test_concurrent_runs_keep_their_contexts_apart() {
  setup_tracing();
  let pipeline = adjustment_pipeline();
  let first = ContextData::new(AdjustmentCtx::requesting(10, 1));
  let second = ContextData::new(AdjustmentCtx::requesting(10, -3));
  let third = ContextData::new(AdjustmentCtx::requesting(1, -5));

  let (r1, r2, r3) = tokio::join!(
    pipeline.run(first.clone()),
    pipeline.run(second.clone()),
    pipeline.run(third.clone())
  );

  assert_eq!(r1.unwrap(), PipelineResult::Completed);
  assert_eq!(r2.unwrap(), PipelineResult::Completed);
  assert!(r3.is_err());
  assert_eq!(first.read().on_hand, 11);
  assert_eq!(second.read().on_hand, 7);
  assert_eq!(third.read().on_hand, 1);
  assert!(!third.read().committed);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_reads_the_live_context() {
  setup_tracing();
  let ctx = ContextData::new(AdjustmentCtx::requesting(2, 2));
  let skip = nothing_staged();

  assert!(skip(ctx.clone()));
  ctx.write().staged = Some(2);
  assert!(!skip(ctx.clone()));
}
