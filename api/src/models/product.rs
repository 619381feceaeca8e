// api/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;

/// One row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  #[serde(rename = "price")]
  pub price_unit: f64,
  pub quantity: i64,
  pub description: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>, // None until the first update
}

impl Product {
  /// Shape returned by create and list.
  pub fn summary(&self) -> Value {
    json!({
      "id": self.id,
      "name": self.name,
      "price": self.price_unit,
      "quantity": self.quantity,
      "description": self.description,
      "created_at": self.created_at,
    })
  }

  /// Shape returned by update.
  pub fn update_summary(&self) -> Value {
    json!({
      "id": self.id,
      "name": self.name,
      "price": self.price_unit,
      "quantity": self.quantity,
      "description": self.description,
      "updated_at": self.updated_at,
    })
  }
}

/// A validated product that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub price_unit: f64,
  pub quantity: i64,
  pub description: String,
}

/// A fully validated set of field changes for one product.
///
/// Built from the request body before the stored product is touched, so a
/// rejected update never leaves a half-applied record behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub price_unit: Option<f64>,
  pub quantity: Option<i64>,
  pub description: Option<String>,
}

impl ProductChanges {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.price_unit.is_none() && self.quantity.is_none() && self.description.is_none()
  }

  /// Returns `product` with every staged field applied. `id` and the
  /// timestamps are left for the store to manage.
  pub fn apply_to(&self, product: &Product) -> Product {
    let mut changed = product.clone();
    if let Some(name) = &self.name {
      changed.name = name.clone();
    }
    if let Some(price_unit) = self.price_unit {
      changed.price_unit = price_unit;
    }
    if let Some(quantity) = self.quantity {
      changed.quantity = quantity;
    }
    if let Some(description) = &self.description {
      changed.description = description.clone();
    }
    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn widget() -> Product {
    Product {
      id: 7,
      name: "Widget".to_string(),
      price_unit: 5.0,
      quantity: 10,
      description: "test".to_string(),
      created_at: Utc::now(),
      updated_at: None,
    }
  }

  #[test]
  fn apply_to_only_touches_staged_fields() {
    let original = widget();
    let changes = ProductChanges {
      quantity: Some(20),
      ..Default::default()
    };

    let changed = changes.apply_to(&original);

    assert_eq!(changed.quantity, 20);
    assert_eq!(changed.name, original.name);
    assert_eq!(changed.price_unit, original.price_unit);
    assert_eq!(changed.description, original.description);
    assert_eq!(original.quantity, 10);
  }

  #[test]
  fn summaries_expose_price_and_the_relevant_timestamp() {
    let product = widget();

    let summary = product.summary();
    assert_eq!(summary["price"], json!(5.0));
    assert!(summary.get("created_at").is_some());
    assert!(summary.get("updated_at").is_none());

    let update_summary = product.update_summary();
    assert_eq!(update_summary["updated_at"], Value::Null);
    assert!(update_summary.get("created_at").is_none());
  }

  #[test]
  fn empty_changes_are_detected() {
    assert!(ProductChanges::default().is_empty());
    assert!(!ProductChanges {
      name: Some("x".to_string()),
      ..Default::default()
    }
    .is_empty());
  }
}
