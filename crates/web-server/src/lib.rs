//! # bizpulse Web Server
//!
//! The data proxy: a small axum server that holds the provider API keys and
//! relays news, product market data, metal prices and AI advice to the dashboard.

use api_client::{MarketDataProvider, ProviderClient};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::{ApiKeys, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
}

/// Builds the proxy's routes on top of `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/news", get(handlers::get_news))
        .route("/api/data", get(handlers::get_product_data))
        .route("/api/metal-prices", get(handlers::get_metal_prices))
        .route("/api/advice", post(handlers::post_advice))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Binds the configured address and serves the proxy until the process exits.
pub async fn run_server(config: &Config, keys: ApiKeys) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    for (name, key) in [
        ("NEWSDATA_API_KEY", &keys.newsdata),
        ("FINNHUB_API_KEY", &keys.finnhub),
        ("DATA_GOV_API_KEY", &keys.data_gov),
        ("METALS_API_KEY", &keys.metals),
        ("GEMINI_API_KEY", &keys.gemini),
    ] {
        if key.is_none() {
            tracing::warn!(key = name, "API key missing; the matching endpoint will return an error.");
        }
    }

    let provider = ProviderClient::new(config.providers.clone(), keys)?;
    let app = build_router(Arc::new(AppState {
        provider: Arc::new(provider),
    }));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Data proxy listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
