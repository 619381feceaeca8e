// api/src/pipelines/contexts.rs

//! Context data for the product pipelines.
//! Handlers receive these wrapped in `stockflow::ContextData`.

use actix_web::web::Bytes;

use crate::models::{NewProduct, Product, ProductChanges};
use crate::store::{SessionSlot, SharedStore};

/// Contexts whose pipeline writes through a store session.
pub trait TransactionalCtx: Send + Sync + 'static {
  fn store(&self) -> SharedStore;
  fn session(&self) -> SessionSlot;
}

/// Contexts that look up one product by id inside the session.
pub trait TargetProductCtx: TransactionalCtx {
  fn product_id(&self) -> i64;
  fn set_current(&mut self, product: Product);
}

pub struct CreateProductCtxData {
  pub store: SharedStore,
  pub session: SessionSlot,
  pub raw_body: Bytes,
  pub new_product: Option<NewProduct>,
  pub created_product: Option<Product>,
}

impl CreateProductCtxData {
  pub fn new(store: SharedStore, raw_body: Bytes) -> Self {
    Self {
      store,
      session: SessionSlot::default(),
      raw_body,
      new_product: None,
      created_product: None,
    }
  }
}

pub struct ListProductsCtxData {
  pub store: SharedStore,
  pub products: Vec<Product>,
}

impl ListProductsCtxData {
  pub fn new(store: SharedStore) -> Self {
    Self {
      store,
      products: Vec::new(),
    }
  }
}

pub struct UpdateProductCtxData {
  pub store: SharedStore,
  pub session: SessionSlot,
  pub product_id: i64,
  pub raw_body: Bytes,
  pub current_product: Option<Product>,
  // Validated as a whole before anything is applied
  pub staged_changes: Option<ProductChanges>,
  pub updated_product: Option<Product>,
}

impl UpdateProductCtxData {
  pub fn new(store: SharedStore, product_id: i64, raw_body: Bytes) -> Self {
    Self {
      store,
      session: SessionSlot::default(),
      product_id,
      raw_body,
      current_product: None,
      staged_changes: None,
      updated_product: None,
    }
  }

  /// The product as it stands after the run: the updated row if anything was
  /// applied, otherwise the row as loaded.
  pub fn resulting_product(&self) -> Option<&Product> {
    self.updated_product.as_ref().or(self.current_product.as_ref())
  }
}

pub struct DeleteProductCtxData {
  pub store: SharedStore,
  pub session: SessionSlot,
  pub product_id: i64,
  pub target_product: Option<Product>,
  pub deleted: bool,
}

impl DeleteProductCtxData {
  pub fn new(store: SharedStore, product_id: i64) -> Self {
    Self {
      store,
      session: SessionSlot::default(),
      product_id,
      target_product: None,
      deleted: false,
    }
  }
}

impl TransactionalCtx for CreateProductCtxData {
  fn store(&self) -> SharedStore {
    self.store.clone()
  }
  fn session(&self) -> SessionSlot {
    self.session.clone()
  }
}

impl TransactionalCtx for UpdateProductCtxData {
  fn store(&self) -> SharedStore {
    self.store.clone()
  }
  fn session(&self) -> SessionSlot {
    self.session.clone()
  }
}

impl TransactionalCtx for DeleteProductCtxData {
  fn store(&self) -> SharedStore {
    self.store.clone()
  }
  fn session(&self) -> SessionSlot {
    self.session.clone()
  }
}

impl TargetProductCtx for UpdateProductCtxData {
  fn product_id(&self) -> i64 {
    self.product_id
  }
  fn set_current(&mut self, product: Product) {
    self.current_product = Some(product);
  }
}

impl TargetProductCtx for DeleteProductCtxData {
  fn product_id(&self) -> i64 {
    self.product_id
  }
  fn set_current(&mut self, product: Product) {
    self.target_product = Some(product);
  }
}
