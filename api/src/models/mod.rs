// api/src/models/mod.rs

//! The product entity and the request payloads that create or change it.

pub mod payload;
pub mod product;

pub use payload::{parse_new_product, parse_product_changes};
pub use product::{NewProduct, Product, ProductChanges};
