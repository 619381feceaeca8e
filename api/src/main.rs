// api/src/main.rs

use inventory_api::config::AppConfig;
use inventory_api::state::AppState;
use inventory_api::store::{MemoryProductStore, PgProductStore, SharedStore};
use inventory_api::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting product inventory server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  // One store handle, injected into every request through AppState.
  let shared_store: SharedStore = if app_config.uses_memory_store() {
    tracing::warn!("DATABASE_URL is 'memory': products are kept in process and lost on exit.");
    Arc::new(MemoryProductStore::new())
  } else {
    match PgProductStore::connect(&app_config).await {
      Ok(store) => Arc::new(store),
      Err(e) => {
        tracing::error!(error = %e, "Failed to initialise the product store.");
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
      }
    }
  };
  let app_state = AppState::new(shared_store);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
