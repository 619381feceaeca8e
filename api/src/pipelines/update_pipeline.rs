// api/src/pipelines/update_pipeline.rs

use std::sync::Arc;
use stockflow::{ContextData, Pipeline, PipelineControl, SkipCondition};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::parse_product_changes;
use crate::pipelines::common_steps::{commit_session_step, load_product_step, open_session_step};
use crate::pipelines::contexts::UpdateProductCtxData;

/// Update runs as stage-then-commit: the body is validated into a complete
/// change set before the loaded product is modified at all.
pub fn build_update_product_pipeline() -> Pipeline<UpdateProductCtxData, AppError> {
  // Bodies that only carry unrecognized keys leave the row (and updated_at) alone.
  let nothing_staged: SkipCondition<UpdateProductCtxData> = Arc::new(|ctx_data: ContextData<UpdateProductCtxData>| {
    ctx_data
      .read()
      .staged_changes
      .as_ref()
      .map_or(true, |changes| changes.is_empty())
  });

  let mut p = Pipeline::<UpdateProductCtxData, AppError>::new(&[
    ("open_session", false, None),
    ("load_product", false, None),
    ("stage_changes", false, None),
    ("apply_changes", false, Some(nothing_staged)),
    ("commit", false, None),
  ]);

  p.on_root("open_session", open_session_step::<UpdateProductCtxData>);

  // 404 takes precedence over any problem with the body
  p.on_root("load_product", load_product_step::<UpdateProductCtxData>);

  p.on_root("stage_changes", |ctx_data: ContextData<UpdateProductCtxData>| {
    Box::pin(async move {
      let (product_id, raw_body) = {
        let guard = ctx_data.read();
        (guard.product_id, guard.raw_body.clone())
      };
      let changes = parse_product_changes(&raw_body).map_err(|e| {
        warn!("Update Product Pipeline: changes for product {} rejected: {}", product_id, e);
        e
      })?;
      info!("Update Product Pipeline: changes for product {} staged: {:?}", product_id, changes);
      ctx_data.write().staged_changes = Some(changes);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("apply_changes", |ctx_data: ContextData<UpdateProductCtxData>| {
    Box::pin(async move {
      let (changed, slot) = {
        let guard = ctx_data.read();
        let current = guard
          .current_product
          .as_ref()
          .ok_or_else(|| AppError::Internal("Loaded product missing from context.".to_string()))?;
        let changes = guard
          .staged_changes
          .as_ref()
          .ok_or_else(|| AppError::Internal("Staged changes missing from context.".to_string()))?;
        (changes.apply_to(current), guard.session.clone())
      };

      let updated = {
        let mut session_guard = slot.lock().await;
        let session = session_guard
          .as_mut()
          .ok_or_else(|| AppError::Internal("No open session to update the product with.".to_string()))?;
        session.update(&changed).await?
      };

      info!("Update Product Pipeline: product {} updated.", updated.id);
      ctx_data.write().updated_product = Some(updated);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("commit", commit_session_step::<UpdateProductCtxData>);

  p
}
