use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mango_music::{
    build_router,
    config::{AppConfig, DEFAULT_LOG_FILTER},
    AppState, InMemoryUserRepository, PostgresUserRepository, SystemClock, UserRepository,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mango Music user service");

    let config = AppConfig::from_env()?;

    let user_repository: Arc<dyn UserRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Using PostgreSQL user repository");
            Arc::new(PostgresUserRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory user repository");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let app_state = AppState::new(user_repository, Arc::new(SystemClock));
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(address = %config.bind_address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
