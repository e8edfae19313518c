pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    estimate::DamageEstimator,
    vision::{HttpVisionClient, VisionClient},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/estimate-damage", post(handlers::estimate_damage))
        // Upload size is enforced by the handler against upload.max_image_bytes.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn app_state(config: &Config) -> Result<handlers::AppState> {
    let client: Arc<dyn VisionClient> = Arc::new(HttpVisionClient::new(&config.vision)?);
    let estimator = DamageEstimator::from_config(client, config);

    Ok(handlers::AppState {
        estimator: Arc::new(estimator),
    })
}

pub async fn run(config: Config) -> Result<()> {
    let app = router(app_state(&config)?);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);
    info!(
        "Forwarding estimates to {} (model: {}, timeout: {}s)",
        config.vision.api_url, config.vision.model, config.vision.timeout_secs
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
