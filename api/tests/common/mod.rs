// api/tests/common/mod.rs
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

use inventory_api::errors::{AppError, Result};
use inventory_api::models::{NewProduct, Product};
use inventory_api::store::{MemoryProductStore, ProductSession, ProductStore};

/// Builds the app around `$store` with the same routes as the server.
#[macro_export]
macro_rules! test_app {
  ($store:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new(inventory_api::AppState::new($store)))
        .configure(inventory_api::web::configure_app_routes),
    )
    .await
  };
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

pub fn widget_body() -> Value {
  json!({"name": "Widget", "quantity": 10, "price": 5.0, "description": "test"})
}

/// Sends `req` and decodes the JSON body.
pub async fn call_json<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
  S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let resp = test::call_service(app, req).await;
  let status = resp.status();
  let body: Value = test::read_body_json(resp).await;
  (status, body)
}

pub fn create_req(body: Value) -> test::TestRequest {
  test::TestRequest::post().uri("/api/v1/product/create").set_json(body)
}

pub fn list_req() -> test::TestRequest {
  test::TestRequest::get().uri("/api/v1/product/")
}

pub fn update_req(id: i64, body: Value) -> test::TestRequest {
  test::TestRequest::put()
    .uri(&format!("/api/v1/product/{}", id))
    .set_json(body)
}

pub fn delete_req(id: i64) -> test::TestRequest {
  test::TestRequest::delete().uri(&format!("/api/v1/product/{}", id))
}

// --- Failure injection ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
  Begin,
  List,
  Insert,
  Update,
  Delete,
  Commit,
}

/// Wraps a memory store and fails one operation with a store error.
/// Counts rollbacks so tests can check the failure path released the session.
#[derive(Clone)]
pub struct FailingStore {
  pub inner: MemoryProductStore,
  pub fail_at: FailPoint,
  pub rollbacks: Arc<AtomicUsize>,
}

impl FailingStore {
  pub fn new(inner: MemoryProductStore, fail_at: FailPoint) -> Self {
    Self {
      inner,
      fail_at,
      rollbacks: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub fn rollback_count(&self) -> usize {
    self.rollbacks.load(Ordering::SeqCst)
  }
}

pub const INJECTED_FAILURE: &str = "connection reset by injected failure";

fn injected() -> AppError {
  AppError::Sqlx(sqlx::Error::Protocol(INJECTED_FAILURE.to_string()))
}

#[async_trait]
impl ProductStore for FailingStore {
  async fn begin(&self) -> Result<Box<dyn ProductSession>> {
    if self.fail_at == FailPoint::Begin {
      return Err(injected());
    }
    Ok(Box::new(FailingSession {
      inner: self.inner.begin().await?,
      fail_at: self.fail_at,
      rollbacks: Arc::clone(&self.rollbacks),
    }))
  }

  async fn list(&self) -> Result<Vec<Product>> {
    if self.fail_at == FailPoint::List {
      return Err(injected());
    }
    self.inner.list().await
  }
}

struct FailingSession {
  inner: Box<dyn ProductSession>,
  fail_at: FailPoint,
  rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl ProductSession for FailingSession {
  async fn insert(&mut self, new_product: NewProduct) -> Result<Product> {
    if self.fail_at == FailPoint::Insert {
      return Err(injected());
    }
    self.inner.insert(new_product).await
  }

  async fn find_for_update(&mut self, id: i64) -> Result<Option<Product>> {
    self.inner.find_for_update(id).await
  }

  async fn update(&mut self, product: &Product) -> Result<Product> {
    if self.fail_at == FailPoint::Update {
      return Err(injected());
    }
    self.inner.update(product).await
  }

  async fn delete(&mut self, id: i64) -> Result<bool> {
    if self.fail_at == FailPoint::Delete {
      return Err(injected());
    }
    self.inner.delete(id).await
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    if self.fail_at == FailPoint::Commit {
      // A failed commit leaves the transaction to be discarded.
      self.inner.rollback().await?;
      return Err(injected());
    }
    self.inner.commit().await
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    self.rollbacks.fetch_add(1, Ordering::SeqCst);
    self.inner.rollback().await
  }
}
