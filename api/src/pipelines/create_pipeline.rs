// api/src/pipelines/create_pipeline.rs

use stockflow::{ContextData, Pipeline, PipelineControl};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::parse_new_product;
use crate::pipelines::common_steps::{commit_session_step, open_session_step};
use crate::pipelines::contexts::CreateProductCtxData;

pub fn build_create_product_pipeline() -> Pipeline<CreateProductCtxData, AppError> {
  let mut p = Pipeline::<CreateProductCtxData, AppError>::new(&[
    ("validate_payload", false, None),
    ("open_session", false, None),
    ("insert_product", false, None),
    ("commit", false, None),
  ]);

  // Step 1: Validate the body before any store work happens
  p.on_root("validate_payload", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let raw_body = { ctx_data.read().raw_body.clone() };
      let new_product = parse_new_product(&raw_body).map_err(|e| {
        warn!("Create Product Pipeline: payload rejected: {}", e);
        e
      })?;
      info!("Create Product Pipeline: payload for '{}' validated.", new_product.name);
      ctx_data.write().new_product = Some(new_product);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: Begin the unit of work
  p.on_root("open_session", open_session_step::<CreateProductCtxData>);

  // Step 3: Insert the row; the store assigns id and created_at
  p.on_root("insert_product", |ctx_data: ContextData<CreateProductCtxData>| {
    Box::pin(async move {
      let (new_product, slot) = {
        let guard = ctx_data.read();
        (guard.new_product.clone(), guard.session.clone())
      };
      let new_product =
        new_product.ok_or_else(|| AppError::Internal("Validated product missing from context.".to_string()))?;

      let created = {
        let mut session_guard = slot.lock().await;
        let session = session_guard
          .as_mut()
          .ok_or_else(|| AppError::Internal("No open session to insert the product with.".to_string()))?;
        session.insert(new_product).await?
      };

      info!("Create Product Pipeline: product {} inserted.", created.id);
      ctx_data.write().created_product = Some(created);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Make it durable
  p.on_root("commit", commit_session_step::<CreateProductCtxData>);

  p
}
