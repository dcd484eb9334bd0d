use crate::handlers::{self, products, users};
use crate::middleware::{add_security_headers, SecurityHeaders};
use crate::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full application router. `production` enables HSTS.
pub fn build_router(state: AppState, production: bool) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn_with_state(
            SecurityHeaders { hsts: production },
            add_security_headers,
        ))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(users::login))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/toggle-active", patch(users::toggle_active))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{id}/toggle-active",
            patch(products::toggle_active),
        )
}
