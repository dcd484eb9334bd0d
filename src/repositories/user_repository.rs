use super::{RepositoryError, RepositoryResult};
use crate::models::{NewUser, PageRequest, Paginated, User, UserFilter};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT_USERS: &str = r#"
    SELECT id, name, email, password, role, is_active, created_at, updated_at
    FROM users
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn list(&self, filter: UserFilter, page: PageRequest)
        -> RepositoryResult<Paginated<User>>;
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;
    /// Persists every column of `user` and refreshes `updated_at`.
    async fn update(&self, user: User) -> RepositoryResult<User>;
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
    let mut has_where = false;

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" WHERE (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR email LIKE ")
            .push_bind(pattern)
            .push(")");
        has_where = true;
    }

    if let Some(is_active) = filter.is_active {
        builder
            .push(if has_where { " AND " } else { " WHERE " })
            .push("is_active = ")
            .push_bind(is_active);
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", SELECT_USERS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE email = ?", SELECT_USERS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> RepositoryResult<Paginated<User>> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count, &filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_USERS);
        push_filters(&mut select, &filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let users = select
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(users, total, page))
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, user: User) -> RepositoryResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, password = ?, role = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role)
        .bind(user.is_active)
        .bind(Utc::now())
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.find_by_id(user.id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
