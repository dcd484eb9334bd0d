use inventory_api::{config::AppConfig, db, routes, shutdown, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let app = routes::build_router(AppState::from_pool(pool.clone()), config.is_production());

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(environment = %config.environment, "Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}
