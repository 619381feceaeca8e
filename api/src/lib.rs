// api/src/lib.rs

//! Product inventory HTTP API: create, list, update and delete products
//! stored in a single `products` table.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod state;
pub mod store;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
