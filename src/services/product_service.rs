use crate::models::{
    CreateProductPayload, NewProduct, PageRequest, Paginated, Product, ProductChanges,
    ProductFilter,
};
use crate::repositories::{ProductRepository, RepositoryError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ProductServiceError {
    #[error("Product not found")]
    ProductNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl ProductServiceError {
    fn from_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ProductServiceError::ProductNotFound,
            e => ProductServiceError::RepositoryError(e),
        }
    }
}

pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Paginated<Product>, ProductServiceError> {
        Ok(self.repository.list(filter, page).await?)
    }

    /// Names are not unique; every valid payload inserts a new row.
    pub async fn create_product(
        &self,
        payload: CreateProductPayload,
    ) -> Result<Product, ProductServiceError> {
        let product = self
            .repository
            .create(NewProduct::from(payload))
            .await
            .map_err(ProductServiceError::from_repository)?;

        tracing::info!(product_id = product.id, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ProductServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductServiceError::ProductNotFound)
    }

    /// Merges `changes` into an already loaded product and persists it.
    pub async fn update_product(
        &self,
        mut product: Product,
        changes: ProductChanges,
    ) -> Result<Product, ProductServiceError> {
        product.merge(changes);
        let product = self
            .repository
            .update(product)
            .await
            .map_err(ProductServiceError::from_repository)?;

        tracing::info!(product_id = product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ProductServiceError> {
        self.repository
            .delete(id)
            .await
            .map_err(ProductServiceError::from_repository)?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn toggle_active(&self, id: i64) -> Result<Product, ProductServiceError> {
        let mut product = self.get_product(id).await?;
        product.active = !product.active;

        let product = self
            .repository
            .update(product)
            .await
            .map_err(ProductServiceError::from_repository)?;

        tracing::info!(
            product_id = product.id,
            active = product.active,
            "Product active flag toggled"
        );
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::product_repository::MockProductRepository;
    use chrono::Utc;
    use mockall::predicate::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn stored_product(id: i64, active: bool) -> Product {
        Product {
            id,
            name: "Pen".to_string(),
            description: None,
            price: Decimal::from_str("1.50").unwrap(),
            stock: 0,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_product_applies_defaults() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_create()
            .withf(|new_product| new_product.stock == 0 && new_product.active)
            .times(1)
            .returning(|new_product| {
                let mut product = stored_product(1, new_product.active);
                product.name = new_product.name;
                Box::pin(async move { Ok(product) })
            });

        let service = ProductService::new(Arc::new(mock_repo));

        let product = service
            .create_product(CreateProductPayload {
                name: "Pen".to_string(),
                description: None,
                price: Decimal::from_str("1.50").unwrap(),
                stock: None,
                active: None,
            })
            .await
            .expect("Expected Ok result");
        assert!(product.active);
    }

    #[tokio::test]
    async fn test_toggle_active_flips_flag() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(7))
            .times(1)
            .returning(|id| {
                let product = stored_product(id, true);
                Box::pin(async move { Ok(Some(product)) })
            });
        mock_repo
            .expect_update()
            .withf(|product| !product.active)
            .times(1)
            .returning(|product| Box::pin(async move { Ok(product) }));

        let service = ProductService::new(Arc::new(mock_repo));

        let product = service.toggle_active(7).await.expect("Expected Ok result");
        assert!(!product.active);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = ProductService::new(Arc::new(mock_repo));

        let result = service.get_product(99).await;
        assert!(matches!(result, Err(ProductServiceError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_delete()
            .with(eq(99))
            .returning(|_| Box::pin(async move { Err(RepositoryError::NotFound) }));

        let service = ProductService::new(Arc::new(mock_repo));

        let result = service.delete_product(99).await;
        assert!(matches!(result, Err(ProductServiceError::ProductNotFound)));
    }
}
