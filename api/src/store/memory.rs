// api/src/store/memory.rs

//! In-process store with the same commit/rollback semantics as the database.
//! Used by the test suite and for running the API without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::{ProductSession, ProductStore};
use crate::errors::Result;
use crate::models::{NewProduct, Product};

#[derive(Debug, Default)]
struct Table {
  rows: BTreeMap<i64, Product>,
  last_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
  table: Arc<Mutex<Table>>,
}

impl MemoryProductStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of committed rows.
  pub fn len(&self) -> usize {
    self.table.lock().rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Committed state of one row.
  pub fn get(&self, id: i64) -> Option<Product> {
    self.table.lock().rows.get(&id).cloned()
  }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
  async fn begin(&self) -> Result<Box<dyn ProductSession>> {
    Ok(Box::new(MemorySession {
      table: Arc::clone(&self.table),
      staged: BTreeMap::new(),
    }))
  }

  async fn list(&self) -> Result<Vec<Product>> {
    // BTreeMap iteration is already ordered by id.
    Ok(self.table.lock().rows.values().cloned().collect())
  }
}

#[derive(Debug, Clone)]
enum Staged {
  Inserted(Product),
  Updated(Product),
  Deleted,
}

/// Writes are staged per id and only reach the table on commit.
struct MemorySession {
  table: Arc<Mutex<Table>>,
  staged: BTreeMap<i64, Staged>,
}

impl MemorySession {
  fn current(&self, id: i64) -> Option<Product> {
    match self.staged.get(&id) {
      Some(Staged::Inserted(product)) | Some(Staged::Updated(product)) => Some(product.clone()),
      Some(Staged::Deleted) => None,
      None => self.table.lock().rows.get(&id).cloned(),
    }
  }
}

#[async_trait]
impl ProductSession for MemorySession {
  async fn insert(&mut self, new_product: NewProduct) -> Result<Product> {
    // Ids are consumed even if the session is rolled back, like a sequence.
    let id = {
      let mut table = self.table.lock();
      table.last_id += 1;
      table.last_id
    };
    let product = Product {
      id,
      name: new_product.name,
      price_unit: new_product.price_unit,
      quantity: new_product.quantity,
      description: new_product.description,
      created_at: Utc::now(),
      updated_at: None,
    };
    self.staged.insert(id, Staged::Inserted(product.clone()));
    Ok(product)
  }

  async fn find_for_update(&mut self, id: i64) -> Result<Option<Product>> {
    Ok(self.current(id))
  }

  async fn update(&mut self, product: &Product) -> Result<Product> {
    let Some(existing) = self.current(product.id) else {
      return Err(sqlx::Error::RowNotFound.into());
    };
    let updated = Product {
      id: existing.id,
      created_at: existing.created_at,
      updated_at: Some(Utc::now()),
      ..product.clone()
    };
    let staged = match self.staged.get(&product.id) {
      Some(Staged::Inserted(_)) => Staged::Inserted(updated.clone()),
      _ => Staged::Updated(updated.clone()),
    };
    self.staged.insert(product.id, staged);
    Ok(updated)
  }

  async fn delete(&mut self, id: i64) -> Result<bool> {
    if self.current(id).is_none() {
      return Ok(false);
    }
    match self.staged.get(&id) {
      // Never committed, so there is nothing to delete from the table.
      Some(Staged::Inserted(_)) => {
        self.staged.remove(&id);
      }
      _ => {
        self.staged.insert(id, Staged::Deleted);
      }
    }
    Ok(true)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let MemorySession { table, staged } = *self;
    let mut table = table.lock();
    for (id, staged) in staged {
      match staged {
        Staged::Inserted(product) => {
          table.rows.insert(id, product);
        }
        // A row deleted by a concurrent session stays deleted.
        Staged::Updated(product) => {
          if let Some(row) = table.rows.get_mut(&id) {
            *row = product;
          }
        }
        Staged::Deleted => {
          table.rows.remove(&id);
        }
      }
    }
    debug!(rows = table.rows.len(), "Memory session committed.");
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    debug!(discarded = self.staged.len(), "Memory session rolled back.");
    Ok(())
  }
}
