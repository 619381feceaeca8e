// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Arc;
use stockflow::{ContextData, FlowError, Pipeline, PipelineControl, SkipCondition};
use tracing::Level;

/// A stock adjustment run in the same shape as the API's write operations:
/// open a session, stage a change, apply it unless nothing was staged, commit.
#[derive(Debug, Default)]
pub struct AdjustmentCtx {
  pub on_hand: i64,
  pub requested: Option<i64>,
  pub staged: Option<i64>,
  pub session_open: bool,
  pub committed: bool,
  pub journal: Vec<&'static str>,
}

impl AdjustmentCtx {
  pub fn requesting(on_hand: i64, requested: i64) -> Self {
    Self {
      on_hand,
      requested: Some(requested),
      ..Default::default()
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum AdjustmentError {
  #[error("{0}")]
  Rejected(String),

  #[error(transparent)]
  Flow(#[from] FlowError),
}

pub async fn open_session(ctx: ContextData<AdjustmentCtx>) -> Result<PipelineControl, AdjustmentError> {
  let mut guard = ctx.write();
  guard.session_open = true;
  guard.journal.push("open_session");
  Ok(PipelineControl::Continue)
}

/// Stages the requested change. A zero adjustment stages nothing.
pub async fn stage(ctx: ContextData<AdjustmentCtx>) -> Result<PipelineControl, AdjustmentError> {
  let mut guard = ctx.write();
  guard.journal.push("stage");
  let requested = guard
    .requested
    .ok_or_else(|| AdjustmentError::Rejected("No adjustment requested".to_string()))?;
  if guard.on_hand + requested < 0 {
    return Err(AdjustmentError::Rejected(format!(
      "Cannot remove {} from {} on hand",
      -requested, guard.on_hand
    )));
  }
  guard.staged = (requested != 0).then_some(requested);
  Ok(PipelineControl::Continue)
}

pub async fn apply(ctx: ContextData<AdjustmentCtx>) -> Result<PipelineControl, AdjustmentError> {
  let mut guard = ctx.write();
  guard.journal.push("apply");
  if let Some(delta) = guard.staged {
    guard.on_hand += delta;
  }
  Ok(PipelineControl::Continue)
}

pub async fn commit(ctx: ContextData<AdjustmentCtx>) -> Result<PipelineControl, AdjustmentError> {
  let mut guard = ctx.write();
  guard.session_open = false;
  guard.committed = true;
  guard.journal.push("commit");
  Ok(PipelineControl::Continue)
}

pub fn nothing_staged() -> SkipCondition<AdjustmentCtx> {
  Arc::new(|ctx: ContextData<AdjustmentCtx>| ctx.read().staged.is_none())
}

pub fn adjustment_pipeline() -> Pipeline<AdjustmentCtx, AdjustmentError> {
  let mut p = Pipeline::new(&[
    ("open_session", false, None),
    ("stage", false, None),
    ("apply", false, Some(nothing_staged())),
    ("commit", false, None),
  ]);
  p.on_root("open_session", open_session);
  p.on_root("stage", stage);
  p.on_root("apply", apply);
  p.on_root("commit", commit);
  p
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
