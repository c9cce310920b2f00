mod agents;
mod cache;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod orchestrator;
mod profiles;
mod routes;
mod similarity;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{spawn_sweeper, SimilarityCache};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{GenerationBackend, LlmClient};
use crate::orchestrator::Orchestrator;
use crate::profiles::{PgProfileStore, ProfileDirectory};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Profile store (read-only)
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    let directory: Arc<dyn ProfileDirectory> = Arc::new(PgProfileStore::new(pool));

    // Generation backend
    let backend: Arc<dyn GenerationBackend> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Similarity cache + periodic sweep
    let cache = Arc::new(SimilarityCache::new(directory.clone(), config.cache_ttl));
    let _sweeper = spawn_sweeper(cache.clone(), config.cache_sweep_interval);
    info!(
        "Similarity cache ready (ttl: {}h, sweep every {:?})",
        config.cache_ttl.num_hours(),
        config.cache_sweep_interval
    );

    // Agents + orchestrator
    let agents = agents::default_agents(directory, backend, cache.clone());
    let orchestrator = Orchestrator::new(agents).with_agent_timeout(config.agent_timeout);
    if let Some(limit) = config.agent_timeout {
        info!("Agent timeout: {limit:?}");
    }

    let state = AppState {
        cache,
        orchestrator: Arc::new(orchestrator),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
