//! Product repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewProduct, Product, ProductChanges, ProductId};

/// Repository trait for the single `products` table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List every product, ordered by ascending id.
    async fn list_products(&self) -> RepositoryResult<Vec<Product>>;

    /// Look up a single product.
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - The product
    /// * `Ok(None)` - No row with that id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_product(&self, product_id: ProductId) -> RepositoryResult<Option<Product>>;

    /// Insert a new row and return it with its assigned id.
    async fn insert_product(&self, product: &NewProduct) -> RepositoryResult<Product>;

    /// Write the supplied fields of `changes` to an existing row.
    ///
    /// Empty `changes` is a no-op.
    ///
    /// # Returns
    /// * `Ok(())` - The row was updated (or nothing needed updating)
    /// * `Err(RepositoryError::NotFound)` - If the row doesn't exist
    async fn update_product(
        &self,
        product_id: ProductId,
        changes: &ProductChanges,
    ) -> RepositoryResult<()>;

    /// Delete a row.
    ///
    /// # Returns
    /// * `Ok(())` - The row was removed
    /// * `Err(RepositoryError::NotFound)` - If the row doesn't exist
    async fn delete_product(&self, product_id: ProductId) -> RepositoryResult<()>;
}
