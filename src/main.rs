use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use navicab_pricing::cache::AppCache;
use navicab_pricing::config::AppConfig;
use navicab_pricing::distance::cache::SystemClock;
use navicab_pricing::distance::provider::MapsClient;
use navicab_pricing::distance::resolver::DistanceResolver;
use navicab_pricing::pricing::rules::builtin_rules;
use navicab_pricing::pricing::services::PricingService;
use navicab_pricing::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("navicab_pricing=debug,info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let vehicles = config.load_vehicle_table()?;

    let cache = AppCache::new();
    let provider = MapsClient::new(config.maps.clone()).context("building maps client")?;
    let resolver = DistanceResolver::new(
        provider,
        config.distance_ttl,
        SystemClock,
        cache.clone(),
    );
    let pricing = PricingService::new(vehicles, builtin_rules(), config.settings.clone());

    let state = AppState {
        resolver: Arc::new(resolver),
        pricing: Arc::new(pricing),
        cache,
    };

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("pricing engine listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
