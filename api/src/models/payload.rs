// api/src/models/payload.rs

//! Validation of raw JSON request bodies into `NewProduct` / `ProductChanges`.

use serde_json::{Map, Value};

use crate::errors::{AppError, Result};
use crate::models::product::{NewProduct, ProductChanges};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const NO_UPDATE_DATA: &str = "No update data provided";
const PRICE_INVALID: &str = "Price must be a positive number";
const CREATE_QUANTITY_INVALID: &str = "Quantity must be a positive integer";
const UPDATE_QUANTITY_INVALID: &str = "Quantity must be a non-negative integer";
const NOT_AN_OBJECT: &str = "Request body must be a JSON object";

/// Validates a create request body.
///
/// Checks run in a fixed order: presence of every field (absent or falsy
/// values are rejected), then price, then quantity, then the text fields.
pub fn parse_new_product(raw: &[u8]) -> Result<NewProduct> {
  let body = decode_body(raw)?;
  let fields = match &body {
    Value::Object(map) => map,
    Value::Null => return Err(AppError::Validation(ALL_FIELDS_REQUIRED.to_string())),
    _ => return Err(AppError::Validation(NOT_AN_OBJECT.to_string())),
  };

  let field = |key: &str| fields.get(key).unwrap_or(&Value::Null);
  let (name, quantity, price, description) = (field("name"), field("quantity"), field("price"), field("description"));

  if [name, price, quantity, description].into_iter().any(is_falsy) {
    return Err(AppError::Validation(ALL_FIELDS_REQUIRED.to_string()));
  }

  let price_unit = positive_price(price)?;
  let quantity = non_negative_quantity(quantity, CREATE_QUANTITY_INVALID)?;

  Ok(NewProduct {
    name: non_empty_text(name, "Name")?,
    price_unit,
    quantity,
    description: non_empty_text(description, "Description")?,
  })
}

/// Validates an update request body into a staged change set.
///
/// Only `name`, `price`, `quantity` and `description` are recognized; other
/// keys are ignored. Every recognized key is validated before the result is
/// returned, so the caller either gets the whole change set or an error.
pub fn parse_product_changes(raw: &[u8]) -> Result<ProductChanges> {
  let body = decode_body(raw)?;
  if is_falsy(&body) {
    return Err(AppError::Validation(NO_UPDATE_DATA.to_string()));
  }
  let fields: &Map<String, Value> = body
    .as_object()
    .ok_or_else(|| AppError::Validation(NOT_AN_OBJECT.to_string()))?;

  let mut changes = ProductChanges::default();
  if let Some(name) = fields.get("name") {
    changes.name = Some(non_empty_text(name, "Name")?);
  }
  if let Some(price) = fields.get("price") {
    changes.price_unit = Some(positive_price(price)?);
  }
  if let Some(quantity) = fields.get("quantity") {
    changes.quantity = Some(non_negative_quantity(quantity, UPDATE_QUANTITY_INVALID)?);
  }
  if let Some(description) = fields.get("description") {
    changes.description = Some(non_empty_text(description, "Description")?);
  }
  Ok(changes)
}

/// An empty (or whitespace-only) body decodes to `null`.
fn decode_body(raw: &[u8]) -> Result<Value> {
  if raw.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Null);
  }
  serde_json::from_slice(raw).map_err(|e| AppError::Validation(format!("Request body must be valid JSON: {}", e)))
}

fn is_falsy(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::Number(n) => n.as_f64() == Some(0.0),
    Value::String(s) => s.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
  }
}

fn positive_price(value: &Value) -> Result<f64> {
  match value.as_f64() {
    Some(price) if price.is_finite() && price > 0.0 => Ok(price),
    _ => Err(AppError::Validation(PRICE_INVALID.to_string())),
  }
}

// as_i64 is None for floats (10.0 included) and for integers beyond i64.
fn non_negative_quantity(value: &Value, message: &str) -> Result<i64> {
  match value.as_i64() {
    Some(quantity) if quantity >= 0 => Ok(quantity),
    _ => Err(AppError::Validation(message.to_string())),
  }
}

fn non_empty_text(value: &Value, label: &str) -> Result<String> {
  match value.as_str() {
    Some(text) if !text.is_empty() => Ok(text.to_string()),
    _ => Err(AppError::Validation(format!("{} must be a non-empty string", label))),
  }
}
