pub mod pagination;
pub mod product;
pub mod user;

pub use pagination::{PageRequest, Paginated, PaginationMeta};
pub use product::{
    CreateProductPayload, NewProduct, Product, ProductChanges, ProductFilter, ProductRow,
};
pub use user::{
    CreateUserPayload, LoginPayload, NewUser, User, UserChanges, UserFilter, UserProfile,
    UserRole,
};
