// api/src/store/mod.rs

//! The persistence gateway.
//!
//! A `ProductStore` is the shared handle injected into every request. Writes
//! go through a `ProductSession`, a unit of work that must end in exactly one
//! `commit` or `rollback`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::models::{NewProduct, Product};

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
  /// Opens a new unit of work.
  async fn begin(&self) -> Result<Box<dyn ProductSession>>;

  /// Every stored product, ordered by ascending `id`.
  async fn list(&self) -> Result<Vec<Product>>;
}

#[async_trait]
pub trait ProductSession: Send {
  /// Inserts a product. The store assigns `id` and `created_at`.
  async fn insert(&mut self, new_product: NewProduct) -> Result<Product>;

  /// Looks a product up and holds it for the rest of the session.
  async fn find_for_update(&mut self, id: i64) -> Result<Option<Product>>;

  /// Overwrites the mutable fields of `product.id` and stamps `updated_at`.
  async fn update(&mut self, product: &Product) -> Result<Product>;

  /// Removes a product. Returns `false` if there was nothing to remove.
  async fn delete(&mut self, id: i64) -> Result<bool>;

  async fn commit(self: Box<Self>) -> Result<()>;

  async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Holds the open session of one request, if any.
///
/// Pipeline steps share it through the request context; the async mutex
/// lets a step keep the session locked across store calls.
#[derive(Clone, Default)]
pub struct SessionSlot(Arc<Mutex<Option<Box<dyn ProductSession>>>>);

impl SessionSlot {
  pub async fn open(&self, session: Box<dyn ProductSession>) {
    *self.0.lock().await = Some(session);
  }

  pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Option<Box<dyn ProductSession>>> {
    self.0.lock().await
  }

  /// Removes the session so it can be committed or rolled back.
  pub async fn take(&self) -> Option<Box<dyn ProductSession>> {
    self.0.lock().await.take()
  }
}

impl std::fmt::Debug for SessionSlot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SessionSlot").finish_non_exhaustive()
  }
}

/// Shared store handle as held in application state.
pub type SharedStore = Arc<dyn ProductStore>;
