// api/src/state.rs
use crate::pipelines::ProductPipelines;
use crate::store::SharedStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: SharedStore,
  pub pipelines: Arc<ProductPipelines>,
}

impl AppState {
  pub fn new(store: SharedStore) -> Self {
    Self {
      store,
      pipelines: Arc::new(ProductPipelines::build()),
    }
  }
}
