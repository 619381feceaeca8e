// api/src/pipelines/mod.rs

//! One stockflow pipeline per product operation.

use stockflow::Pipeline;

use crate::errors::AppError;

pub mod common_steps;
pub mod contexts;

pub mod create_pipeline;
pub mod delete_pipeline;
pub mod list_pipeline;
pub mod update_pipeline;

use contexts::{CreateProductCtxData, DeleteProductCtxData, ListProductsCtxData, UpdateProductCtxData};

/// The product pipelines, built once at startup and shared by all workers.
pub struct ProductPipelines {
  pub create: Pipeline<CreateProductCtxData, AppError>,
  pub list: Pipeline<ListProductsCtxData, AppError>,
  pub update: Pipeline<UpdateProductCtxData, AppError>,
  pub delete: Pipeline<DeleteProductCtxData, AppError>,
}

impl ProductPipelines {
  pub fn build() -> Self {
    tracing::info!("Building product pipelines...");
    let pipelines = Self {
      create: create_pipeline::build_create_product_pipeline(),
      list: list_pipeline::build_list_products_pipeline(),
      update: update_pipeline::build_update_product_pipeline(),
      delete: delete_pipeline::build_delete_product_pipeline(),
    };
    tracing::info!("All product pipelines built.");
    pipelines
  }
}
