// api/src/store/postgres.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info, instrument};

use super::{ProductSession, ProductStore};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, price_unit, quantity, description, created_at, updated_at";

/// PostgreSQL-backed store. Each session is one database transaction.
#[derive(Debug, Clone)]
pub struct PgProductStore {
  pool: PgPool,
}

impl PgProductStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Builds the connection pool from configuration and optionally applies
  /// the embedded migrations.
  #[instrument(name = "store::connect", skip(config), fields(max_connections = config.database_max_connections))]
  pub async fn connect(config: &AppConfig) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.database_max_connections)
      .connect(&config.database_url)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        e
      })?;
    info!("Successfully connected to the database.");

    if config.run_migrations {
      sqlx::migrate!("./migrations").run(&pool).await?;
      info!("Database migrations applied.");
    }

    Ok(Self::new(pool))
  }
}

#[async_trait]
impl ProductStore for PgProductStore {
  async fn begin(&self) -> Result<Box<dyn ProductSession>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgSession { tx }))
  }

  async fn list(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products ORDER BY id ASC", PRODUCT_COLUMNS))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }
}

struct PgSession {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ProductSession for PgSession {
  async fn insert(&mut self, new_product: NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, price_unit, quantity, description, created_at) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(&new_product.name)
    .bind(new_product.price_unit)
    .bind(new_product.quantity)
    .bind(&new_product.description)
    .bind(Utc::now())
    .fetch_one(&mut *self.tx)
    .await?;
    Ok(product)
  }

  async fn find_for_update(&mut self, id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE id = $1 FOR UPDATE",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *self.tx)
    .await?;
    Ok(product)
  }

  async fn update(&mut self, product: &Product) -> Result<Product> {
    let updated = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET name = $2, price_unit = $3, quantity = $4, description = $5, updated_at = $6 \
       WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price_unit)
    .bind(product.quantity)
    .bind(&product.description)
    .bind(Utc::now())
    .fetch_one(&mut *self.tx)
    .await?;
    Ok(updated)
  }

  async fn delete(&mut self, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    self.tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    self.tx.rollback().await?;
    Ok(())
  }
}
