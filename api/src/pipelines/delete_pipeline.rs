// api/src/pipelines/delete_pipeline.rs

use stockflow::{ContextData, Pipeline, PipelineControl};
use tracing::info;

use crate::errors::AppError;
use crate::pipelines::common_steps::{commit_session_step, load_product_step, open_session_step, PRODUCT_NOT_FOUND};
use crate::pipelines::contexts::DeleteProductCtxData;

pub fn build_delete_product_pipeline() -> Pipeline<DeleteProductCtxData, AppError> {
  let mut p = Pipeline::<DeleteProductCtxData, AppError>::new(&[
    ("open_session", false, None),
    ("load_product", false, None),
    ("delete_product", false, None),
    ("commit", false, None),
  ]);

  p.on_root("open_session", open_session_step::<DeleteProductCtxData>);
  p.on_root("load_product", load_product_step::<DeleteProductCtxData>);

  p.on_root("delete_product", |ctx_data: ContextData<DeleteProductCtxData>| {
    Box::pin(async move {
      let (product_id, slot) = {
        let guard = ctx_data.read();
        (guard.product_id, guard.session.clone())
      };

      let removed = {
        let mut session_guard = slot.lock().await;
        let session = session_guard
          .as_mut()
          .ok_or_else(|| AppError::Internal("No open session to delete the product with.".to_string()))?;
        session.delete(product_id).await?
      };

      // The row was locked by load_product, so this only happens if it vanished anyway.
      if !removed {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
      }

      info!("Delete Product Pipeline: product {} deleted.", product_id);
      ctx_data.write().deleted = true;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("commit", commit_session_step::<DeleteProductCtxData>);

  p
}
