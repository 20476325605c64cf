use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scholia_api::{build_router, config::Config, state::AppState};
use scholia_persist::PersistenceClient;
use scholia_tutor::{HttpTutorClient, TutorClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Scholia API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!(base_url = %config.tutor.base_url, "Initializing tutor client");
    let tutor: Arc<dyn TutorClient> = Arc::new(HttpTutorClient::new(&config.tutor)?);

    let persist = connect_persistence(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), persist, tutor));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "memory"))]
async fn connect_persistence(config: &Config) -> anyhow::Result<Arc<dyn PersistenceClient>> {
    tracing::info!("Connecting to MongoDB");
    let client = scholia_persist::MongoPersistenceClient::connect(
        &config.mongodb_uri,
        &config.mongodb.database,
    )
    .await?;
    tracing::info!("MongoDB connected");
    Ok(Arc::new(client))
}

#[cfg(feature = "memory")]
async fn connect_persistence(_config: &Config) -> anyhow::Result<Arc<dyn PersistenceClient>> {
    tracing::warn!("Using in-memory persistence; data is lost on shutdown");
    Ok(Arc::new(scholia_persist::MemoryPersistenceClient::new()))
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
