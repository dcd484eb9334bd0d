pub mod test_helpers {
    use crate::{db, services::password, AppState};
    use chrono::Utc;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        db::run_migrations(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when more than one connection must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = db::create_pool(&database_url, 5).await?;

        // Run migrations
        db::run_migrations(&pool).await?;

        Ok((pool, temp_file))
    }

    /// In-memory database plus the state the router is built from
    pub async fn create_test_state() -> Result<(SqlitePool, AppState), sqlx::Error> {
        let pool = create_test_db().await?;
        let state = AppState::from_pool(pool.clone());
        Ok((pool, state))
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
        is_active: bool,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = password::hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 'user', ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a test product; `price_cents` is the stored integer price
    pub async fn insert_test_product(
        pool: &SqlitePool,
        name: &str,
        price_cents: i64,
        stock: i64,
        active: bool,
    ) -> Result<i64, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, stock, active, created_at, updated_at)
            VALUES (?, NULL, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(price_cents)
        .bind(stock)
        .bind(active)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Count rows in a table; `table` must be a trusted literal
    pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
    }
}
