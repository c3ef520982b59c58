//! Service layer for product persistence.
//!
//! Thin functions over [`ProductRepository`] that work with any backend.
//! Handlers call these rather than the repository directly so every storage
//! call gets the same logging.

use log::{debug, info, warn};

use crate::api::{NewProduct, Product, ProductChanges, ProductId};
use crate::db::repository::{ProductRepository, RepositoryResult};

/// Check that the backend answers.
pub async fn health_check<R: ProductRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List all products in ascending id order.
pub async fn list_products<R: ProductRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Product>> {
    let products = repo.list_products().await?;
    debug!("Service layer: listed {} products", products.len());
    Ok(products)
}

/// Look up a product by id. `Ok(None)` when no such row exists.
pub async fn get_product<R: ProductRepository + ?Sized>(
    repo: &R,
    product_id: ProductId,
) -> RepositoryResult<Option<Product>> {
    debug!("Service layer: loading product {}", product_id);
    repo.get_product(product_id).await
}

/// Insert a product and return the stored row.
pub async fn create_product<R: ProductRepository + ?Sized>(
    repo: &R,
    product: &NewProduct,
) -> RepositoryResult<Product> {
    let stored = repo.insert_product(product).await?;
    info!(
        "Service layer: created product {} ('{}', price {})",
        stored.id, stored.name, stored.price
    );
    Ok(stored)
}

/// Apply a partial update to an existing product.
pub async fn update_product<R: ProductRepository + ?Sized>(
    repo: &R,
    product_id: ProductId,
    changes: &ProductChanges,
) -> RepositoryResult<()> {
    if changes.is_empty() {
        warn!(
            "Service layer: update for product {} carries no changes",
            product_id
        );
    }
    repo.update_product(product_id, changes).await?;
    info!("Service layer: updated product {}", product_id);
    Ok(())
}

/// Delete a product.
pub async fn delete_product<R: ProductRepository + ?Sized>(
    repo: &R,
    product_id: ProductId,
) -> RepositoryResult<()> {
    repo.delete_product(product_id).await?;
    info!("Service layer: deleted product {}", product_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_services_work_through_trait_object() {
        let repo: Arc<dyn ProductRepository> = Arc::new(LocalRepository::new());
        let created = create_product(
            repo.as_ref(),
            &NewProduct {
                name: "Widget".to_string(),
                price: 9.99,
            },
        )
        .await
        .unwrap();

        let fetched = get_product(repo.as_ref(), created.id).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        update_product(
            repo.as_ref(),
            created.id,
            &ProductChanges {
                name: Some("Gadget".to_string()),
                price: None,
            },
        )
        .await
        .unwrap();

        let listed = list_products(repo.as_ref()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Gadget");
        assert_eq!(listed[0].price, 9.99);

        delete_product(repo.as_ref(), created.id).await.unwrap();
        assert!(get_product(repo.as_ref(), created.id).await.unwrap().is_none());
        assert!(health_check(repo.as_ref()).await.unwrap());
    }
}
