// api/src/pipelines/common_steps.rs

//! Steps shared by the create, update and delete pipelines.

use stockflow::{ContextData, FlowResult, PipelineControl};
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{TargetProductCtx, TransactionalCtx};
use crate::store::SessionSlot;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[instrument(name = "common_step::open_session", skip(ctx_data), err)]
pub async fn open_session_step<T: TransactionalCtx>(ctx_data: ContextData<T>) -> FlowResult<PipelineControl, AppError> {
  let (store, slot) = {
    let guard = ctx_data.read();
    (guard.store(), guard.session())
  }; // guard dropped

  let session = store.begin().await?;
  slot.open(session).await;
  Ok(PipelineControl::Continue)
}

/// Loads the target row inside the session; 404 if it does not exist.
#[instrument(name = "common_step::load_product", skip(ctx_data), err)]
pub async fn load_product_step<T: TargetProductCtx>(ctx_data: ContextData<T>) -> FlowResult<PipelineControl, AppError> {
  let (product_id, slot) = {
    let guard = ctx_data.read();
    (guard.product_id(), guard.session())
  };

  let found = {
    let mut session_guard = slot.lock().await;
    let session = session_guard
      .as_mut()
      .ok_or_else(|| AppError::Internal("No open session to load the product with.".to_string()))?;
    session.find_for_update(product_id).await?
  };

  match found {
    Some(product) => {
      info!(product_id, "Product loaded.");
      ctx_data.write().set_current(product);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(product_id, "Product not found.");
      Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }
  }
}

#[instrument(name = "common_step::commit_session", skip(ctx_data), err)]
pub async fn commit_session_step<T: TransactionalCtx>(ctx_data: ContextData<T>) -> FlowResult<PipelineControl, AppError> {
  let slot = ctx_data.read().session();
  let session = slot
    .take()
    .await
    .ok_or_else(|| AppError::Internal("No open session to commit.".to_string()))?;
  session.commit().await?;
  info!("Session committed.");
  Ok(PipelineControl::Continue)
}

/// Rolls back whatever session a failed run left open. Rollback failures are
/// logged only; the caller keeps reporting the original error.
pub async fn rollback_open_session(slot: &SessionSlot) {
  if let Some(session) = slot.take().await {
    match session.rollback().await {
      Ok(()) => info!("Session rolled back."),
      Err(e) => error!(error = %e, "Failed to roll back session."),
    }
  }
}
