use anyhow::Result;
use aws_config::BehaviorVersion;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use booker::{
    config::AppConfig, routes, session::SessionManager, state::AppState, uploads::ImageStore,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting booking site");

    let app_config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;
    database::run_migrations(&pool).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize sessions
    let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;
    let sessions = SessionManager::new(redis_pool, app_config.session_ttl_seconds);
    match sessions.health_check().await {
        Ok(true) => info!("Redis connection successful"),
        Ok(false) | Err(_) => error!("Redis is unreachable, logins will fail until it recovers"),
    }

    // Initialize AWS S3 client
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut s3_config = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(endpoint) = &app_config.image_endpoint {
        info!("Using custom image endpoint: {}", endpoint);
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
    }
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
    let images = ImageStore::new(
        s3_client,
        app_config.image_bucket.clone(),
        app_config.image_key_prefix.clone(),
    );

    let app_state = AppState::new(pool, sessions, images, app_config.secure_cookies);
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&app_config.bind_address).await?;
    info!("Booking site listening on {}", app_config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Booking site stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down booking site");
}
