pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod validators;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use repositories::{SqliteProductRepository, SqliteUserRepository};
use services::{AuthService, ProductService, UserService};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
}

impl AppState {
    /// Wires the SQLite repositories into the services.
    pub fn from_pool(pool: SqlitePool) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let product_repository = Arc::new(SqliteProductRepository::new(pool));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository)),
            product_service: Arc::new(ProductService::new(product_repository)),
        }
    }
}
