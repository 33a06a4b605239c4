use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prana::api::{create_router, AppState};
use prana::config::Config;
use prana::db::{Database, DatabaseBackend, LibSqlBackend};
use prana::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "prana")]
#[command(about = "Self-hostable wellness coaching backend")]
struct Args {
    /// Create the schema and exit
    #[arg(long)]
    init_db: bool,

    /// Drop and recreate every table, then exit
    #[arg(long, conflicts_with = "init_db")]
    reset_db: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!("PRANA_API_KEYS is not set, protected routes will reject every request");
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;

    if args.reset_db {
        raw_db.reset().await?;
        tracing::info!("Database reset complete");
        return Ok(());
    }
    if args.init_db {
        tracing::info!("Database schema ready");
        return Ok(());
    }

    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable, recipes will use the built-in fallback");
    }
    if config.integrations.usda_api_key.is_none() {
        tracing::warn!("USDA_API_KEY is not set, nutrient lookups will report not found");
    }
    if config.integrations.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY is not set, yoga plans will use the fallback video");
    }

    let state = AppState::new(config.clone(), db, llm)?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Prana starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prana=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
