pub mod auth_service;
pub mod password;
pub mod product_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError};
pub use product_service::{ProductService, ProductServiceError};
pub use user_service::{UserService, UserServiceError};
