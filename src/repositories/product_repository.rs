use super::{RepositoryError, RepositoryResult};
use crate::models::product::price_to_cents;
use crate::models::{NewProduct, PageRequest, Paginated, Product, ProductFilter, ProductRow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT_PRODUCTS: &str = r#"
    SELECT id, name, description, price_cents, stock, active, created_at, updated_at
    FROM products
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;
    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> RepositoryResult<Paginated<Product>>;
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product>;
    /// Persists every column of `product` and refreshes `updated_at`.
    async fn update(&self, product: Product) -> RepositoryResult<Product>;
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    if let Some(active) = filter.active {
        builder.push(" WHERE active = ").push_bind(active);
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = ?", SELECT_PRODUCTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> RepositoryResult<Paginated<Product>> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_PRODUCTS);
        push_filters(&mut select, &filter);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = select
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(rows, total, page).map(Product::from))
    }

    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        let price_cents =
            price_to_cents(product.price).ok_or(RepositoryError::InvalidValue("price_cents"))?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, stock, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(price_cents)
        .bind(product.stock)
        .bind(product.active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, product: Product) -> RepositoryResult<Product> {
        let price_cents = product
            .price_cents()
            .ok_or(RepositoryError::InvalidValue("price_cents"))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price_cents = ?, stock = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(price_cents)
        .bind(product.stock)
        .bind(product.active)
        .bind(Utc::now())
        .bind(product.id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.find_by_id(product.id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
