// api/src/pipelines/list_pipeline.rs

use stockflow::{ContextData, Pipeline, PipelineControl};
use tracing::info;

use crate::errors::AppError;
use crate::pipelines::contexts::ListProductsCtxData;

// Read-only: no session, nothing to roll back.
pub fn build_list_products_pipeline() -> Pipeline<ListProductsCtxData, AppError> {
  let mut p = Pipeline::<ListProductsCtxData, AppError>::new(&[("fetch_products", false, None)]);

  p.on_root("fetch_products", |ctx_data: ContextData<ListProductsCtxData>| {
    Box::pin(async move {
      let store = { ctx_data.read().store.clone() };
      let products = store.list().await?;
      info!("List Products Pipeline: fetched {} products.", products.len());
      ctx_data.write().products = products;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}
