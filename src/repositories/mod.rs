pub mod product_repository;
pub mod user_repository;

pub use product_repository::{ProductRepository, SqliteProductRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
    #[error("Invalid value for column {0}")]
    InvalidValue(&'static str),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps UNIQUE constraint violations to `AlreadyExists`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        let unique_violation = err
            .as_database_error()
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false);

        if unique_violation {
            RepositoryError::AlreadyExists
        } else {
            RepositoryError::Database(err)
        }
    }
}
