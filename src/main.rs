//! tradeoff-compass server binary.
//!
//! Configuration comes from `TRADEOFF_COMPASS__*` environment variables
//! (see [`tradeoff_compass::config::AppConfig`]).

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tradeoff_compass::adapters::ai::OpenAIProvider;
use tradeoff_compass::adapters::http::{api_router, ComparisonHandlers};
use tradeoff_compass::adapters::postgres::PostgresComparisonRepository;
use tradeoff_compass::adapters::storage::InMemoryComparisonRepository;
use tradeoff_compass::application::handlers::comparison::{
    ExecuteComparisonHandler, GetComparisonHandler,
};
use tradeoff_compass::config::{AppConfig, DatabaseConfig};
use tradeoff_compass::ports::{AIProvider, ComparisonRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let repository = build_repository(config.database.as_ref()).await?;

    let ai_provider: Arc<dyn AIProvider> =
        Arc::new(OpenAIProvider::new(config.ai.provider_config()?)?);
    let info = ai_provider.provider_info();
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        max_retries = config.ai.max_retries,
        "Completion provider configured"
    );

    let execute_handler = Arc::new(
        ExecuteComparisonHandler::new(repository.clone(), ai_provider.clone())
            .with_generation(config.ai.max_tokens, config.ai.temperature),
    );
    let get_handler = Arc::new(GetComparisonHandler::new(repository));
    let handlers = ComparisonHandlers::new(execute_handler, get_handler, ai_provider);

    let app = api_router(
        handlers,
        config.server.request_timeout(),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "tradeoff-compass listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_repository(
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn ComparisonRepository>, Box<dyn Error>> {
    let Some(database) = database else {
        tracing::warn!("No database configured, comparisons are kept in memory only");
        return Ok(Arc::new(InMemoryComparisonRepository::new()));
    };

    let pool = database.pool_options().connect(&database.url).await?;
    tracing::info!("Connected to database");

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresComparisonRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
