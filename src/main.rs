use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use void_backend::controllers::void::VoidController;
use void_backend::domain::void::{SamplingEngine, VoidService};
use void_backend::infrastructure::config::{Config, LogFormat};
use void_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use void_backend::infrastructure::http::{build_router, start_http_server};
use void_backend::infrastructure::repositories::{MemoRepository, ProfileRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Void Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    if config.is_development() {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let memo_repo = Arc::new(MemoRepository::new(pool.clone()));
    let profile_repo = Arc::new(ProfileRepository::new(pool.clone()));

    // 2. Instantiate the sampler and services
    tracing::info!(
        oversample_factor = config.void_oversample_factor,
        "Instantiating services..."
    );
    let engine = Arc::new(
        SamplingEngine::new(memo_repo, profile_repo)
            .with_oversample_factor(config.void_oversample_factor),
    );
    let void_service = Arc::new(VoidService::new(engine, config.session_settings()));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let void_controller = Arc::new(VoidController::new(void_service.clone()));

    // Start HTTP server with all routes
    let app = build_router(void_service, void_controller);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "void_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
