//! In-memory local repository implementation.
//!
//! All data lives in a `BTreeMap` keyed by id, which gives the ascending-id
//! listing order for free. Suitable for unit tests and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{NewProduct, Product, ProductChanges, ProductId};
use crate::db::repository::{ErrorContext, ProductRepository, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying store.
///
/// # Example
/// ```
/// use product_api::api::NewProduct;
/// use product_api::db::repositories::LocalRepository;
/// use product_api::db::repository::ProductRepository;
///
/// # tokio_test_block(async {
/// let repo = LocalRepository::new();
/// let product = repo
///     .insert_product(&NewProduct { name: "Widget".into(), price: 9.99 })
///     .await
///     .unwrap();
/// assert_eq!(product.id.value(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    products: BTreeMap<ProductId, Product>,
    // Ids are never reused, even after deletes.
    next_product_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            next_product_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Number of stored products.
    pub fn product_count(&self) -> usize {
        self.data.read().products.len()
    }

    /// Flip the health flag reported by [`ProductRepository::health_check`].
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Drop every row and reset the id counter.
    pub fn clear(&self) {
        *self.data.write() = LocalData::default();
    }

    fn missing(operation: &str, product_id: ProductId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Product {} not found", product_id),
            ErrorContext::new(operation)
                .with_entity("product")
                .with_entity_id(product_id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.data.read().products.values().cloned().collect())
    }

    async fn get_product(&self, product_id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.data.read().products.get(&product_id).cloned())
    }

    async fn insert_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut data = self.data.write();
        let id = ProductId(data.next_product_id);
        data.next_product_id += 1;

        let row = Product {
            id,
            name: product.name.clone(),
            price: product.price,
        };
        data.products.insert(id, row.clone());
        log::debug!("Inserted product {} into local repository", id);
        Ok(row)
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        changes: &ProductChanges,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        let row = data
            .products
            .get_mut(&product_id)
            .ok_or_else(|| Self::missing("update_product", product_id))?;
        changes.apply_to(row);
        Ok(())
    }

    async fn delete_product(&self, product_id: ProductId) -> RepositoryResult<()> {
        self.data
            .write()
            .products
            .remove(&product_id)
            .map(|_| ())
            .ok_or_else(|| Self::missing("delete_product", product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            price: 9.99,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let a = repo.insert_product(&widget()).await.unwrap();
        let b = repo.insert_product(&widget()).await.unwrap();
        assert_eq!(a.id, ProductId(1));
        assert_eq!(b.id, ProductId(2));
        assert_eq!(repo.product_count(), 2);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let repo = LocalRepository::new();
        let a = repo.insert_product(&widget()).await.unwrap();
        repo.delete_product(a.id).await.unwrap();
        let b = repo.insert_product(&widget()).await.unwrap();
        assert_eq!(b.id, ProductId(2));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = LocalRepository::new();
        for name in ["c", "a", "b"] {
            repo.insert_product(&NewProduct {
                name: name.to_string(),
                price: 1.0,
            })
            .await
            .unwrap();
        }
        let ids: Vec<i64> = repo
            .list_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .update_product(ProductId(42), &ProductChanges::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let repo = LocalRepository::new();
        assert!(repo.delete_product(ProductId(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_health_flag() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_resets_counter() {
        let repo = LocalRepository::new();
        repo.insert_product(&widget()).await.unwrap();
        repo.clear();
        assert_eq!(repo.product_count(), 0);
        let p = repo.insert_product(&widget()).await.unwrap();
        assert_eq!(p.id, ProductId(1));
    }
}
