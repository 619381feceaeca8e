// api/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use stockflow::{ContextData, Pipeline, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::common_steps::rollback_open_session;
use crate::pipelines::contexts::{
  CreateProductCtxData, DeleteProductCtxData, ListProductsCtxData, TransactionalCtx, UpdateProductCtxData,
};
use crate::state::AppState;

/// Runs a writing pipeline. Any failure rolls back the session the run left
/// open before the error is handed to actix for rendering.
async fn run_with_rollback<T: TransactionalCtx>(
  pipeline: &Pipeline<T, AppError>,
  ctx_data: ContextData<T>,
) -> Result<(), AppError> {
  let slot = ctx_data.read().session();
  match pipeline.run(ctx_data).await {
    Ok(PipelineResult::Completed) => Ok(()),
    Ok(PipelineResult::Stopped) => {
      warn!("Product pipeline was stopped by a handler.");
      rollback_open_session(&slot).await;
      Err(halted())
    }
    Err(app_err) => {
      rollback_open_session(&slot).await;
      Err(app_err)
    }
  }
}

fn halted() -> AppError {
  AppError::Internal("Pipeline was stopped before it completed.".to_string())
}

fn missing_output(what: &str) -> AppError {
  AppError::Internal(format!("Pipeline completed, but the {} is unavailable.", what))
}

#[instrument(name = "handler::create_product", skip(app_state, body), fields(body_len = body.len()))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CreateProductCtxData::new(app_state.store.clone(), body));
  run_with_rollback(&app_state.pipelines.create, ctx_data.clone()).await?;

  let response_body = {
    let guard = ctx_data.read();
    let product = guard.created_product.as_ref().ok_or_else(|| missing_output("created product"))?;
    info!("Product {} created.", product.id);
    json!({
        "message": format!("{} has been successfully created", product.name),
        "product": product.summary()
    })
  };

  Ok(HttpResponse::Created().json(response_body))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(ListProductsCtxData::new(app_state.store.clone()));
  match app_state.pipelines.list.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {}
    PipelineResult::Stopped => return Err(halted()),
  }

  let products: Vec<_> = ctx_data.read().products.iter().map(|p| p.summary()).collect();
  info!("Listing {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
      "count": products.len(),
      "products": products
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, body), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let ctx_data = ContextData::new(UpdateProductCtxData::new(app_state.store.clone(), product_id, body));
  run_with_rollback(&app_state.pipelines.update, ctx_data.clone()).await?;

  let product_summary = {
    let guard = ctx_data.read();
    let product = guard.resulting_product().ok_or_else(|| missing_output("updated product"))?;
    product.update_summary()
  };
  info!("Product {} updated.", product_id);

  Ok(HttpResponse::Ok().json(json!({
      "message": "Product updated successfully",
      "product": product_summary
  })))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let ctx_data = ContextData::new(DeleteProductCtxData::new(app_state.store.clone(), product_id));
  run_with_rollback(&app_state.pipelines.delete, ctx_data.clone()).await?;

  let deleted_name = {
    let guard = ctx_data.read();
    match (&guard.target_product, guard.deleted) {
      (Some(product), true) => product.name.clone(),
      _ => return Err(missing_output("deleted product")),
    }
  };
  info!("Product {} deleted.", product_id);

  Ok(HttpResponse::Ok().json(json!({
      "message": format!("Product '{}' deleted successfully", deleted_name),
      "id": product_id
  })))
}
