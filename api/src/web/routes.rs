// api/src/web/routes.rs

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

use crate::errors::AppError;
use crate::pipelines::common_steps::PRODUCT_NOT_FOUND;
use crate::web::handlers::product_handlers;

/// Largest request body the product routes accept.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

const BODY_TOO_LARGE: &str = "Request body is too large";

async fn home_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("Product Inventory API")
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn unmatched_route_handler() -> Result<HttpResponse, AppError> {
  Err(AppError::NotFound("Resource not found".to_string()))
}

// An oversized body fails in the extractor, before any handler runs.
fn body_too_large<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
  let (req, res) = res.into_parts();
  if let Some(err) = res.error() {
    tracing::debug!(error = %err, "Rejected request body.");
  }
  let res = AppError::Validation(BODY_TOO_LARGE.to_string()).error_response();
  Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, res).map_into_right_body()))
}

/// Registers every route on the app. Called from `main.rs` and the tests.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Ids that don't parse as integers can't name a product.
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
      tracing::debug!(error = %err, "Rejected product path.");
      AppError::NotFound(PRODUCT_NOT_FOUND.to_string()).into()
    }))
    .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
    .route("/", web::get().to(home_handler))
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/product")
            .route("/create", web::post().to(product_handlers::create_product_handler))
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("/", web::get().to(product_handlers::list_products_handler))
            .route("/{id}", web::put().to(product_handlers::update_product_handler))
            .route("/{id}", web::delete().to(product_handlers::delete_product_handler)),
        )
        .wrap(ErrorHandlers::new().handler(StatusCode::PAYLOAD_TOO_LARGE, body_too_large)),
    )
    .default_service(web::to(unmatched_route_handler));
}
