//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic creation of the `products` table on first start
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::api::{NewProduct, Product, ProductChanges, ProductId};
use crate::db::repository::{ErrorContext, ProductRepository, RepositoryError, RepositoryResult};

mod models;
mod schema;

use models::*;
use schema::products;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_pool_size);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.min_pool_size);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.idle_timeout_sec);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        log::info!(
            "Postgres repository ready (max_pool_size={})",
            config.max_pool_size
        );

        Ok(Self { pool, config })
    }

    /// Settings the pool was built with.
    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    ///
    /// Failures are returned as-is; there is no retry.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection"),
                )
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> RepositoryError {
    move |err| RepositoryError::from(err).with_operation(operation)
}

fn missing(operation: &str, product_id: ProductId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Product {} not found", product_id),
        ErrorContext::new(operation)
            .with_entity("product")
            .with_entity_id(product_id),
    )
}

#[async_trait]
impl ProductRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error("health_check"))
        })
        .await
    }

    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        self.with_conn(|conn| {
            let rows = products::table
                .select(ProductRow::as_select())
                .order(products::id.asc())
                .load::<ProductRow>(conn)
                .map_err(map_diesel_error("list_products"))?;

            Ok(rows.into_iter().map(Product::from).collect())
        })
        .await
    }

    async fn get_product(&self, product_id: ProductId) -> RepositoryResult<Option<Product>> {
        self.with_conn(move |conn| {
            let row = products::table
                .find(product_id.value())
                .select(ProductRow::as_select())
                .first::<ProductRow>(conn)
                .optional()
                .map_err(map_diesel_error("get_product"))?;

            Ok(row.map(Product::from))
        })
        .await
    }

    async fn insert_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let new_row = NewProductRow::from(product);
        self.with_conn(move |conn| {
            let row = diesel::insert_into(products::table)
                .values(&new_row)
                .returning(ProductRow::as_returning())
                .get_result::<ProductRow>(conn)
                .map_err(map_diesel_error("insert_product"))?;

            log::debug!("Inserted product {}", row.id);
            Ok(Product::from(row))
        })
        .await
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        changes: &ProductChanges,
    ) -> RepositoryResult<()> {
        // Diesel rejects an empty changeset, so only check existence.
        if changes.is_empty() {
            return match self.get_product(product_id).await? {
                Some(_) => Ok(()),
                None => Err(missing("update_product", product_id)),
            };
        }

        let changeset = ProductChangesRow::from(changes);
        self.with_conn(move |conn| {
            let updated = diesel::update(products::table.find(product_id.value()))
                .set(&changeset)
                .execute(conn)
                .map_err(map_diesel_error("update_product"))?;

            if updated == 0 {
                return Err(missing("update_product", product_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_product(&self, product_id: ProductId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(products::table.find(product_id.value()))
                .execute(conn)
                .map_err(map_diesel_error("delete_product"))?;

            if deleted == 0 {
                return Err(missing("delete_product", product_id));
            }
            Ok(())
        })
        .await
    }
}
