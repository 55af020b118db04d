use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    cloudinary::ImageUploader, gateway::BackendGateways, routes, settings::SettingsStore,
    types::Environment,
};

/// Builds the application router with all dependencies attached
pub fn router(
    environment: Environment,
    gateways: BackendGateways,
    image_uploader: Arc<dyn ImageUploader>,
    settings_store: Arc<dyn SettingsStore>,
) -> Router {
    let mut openapi = OpenApi::default();

    routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(gateways))
        .layer(Extension(image_uploader))
        .layer(Extension(settings_store))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    gateways: BackendGateways,
    image_uploader: Arc<dyn ImageUploader>,
    settings_store: Arc<dyn SettingsStore>,
) -> anyhow::Result<()> {
    // Outbound calls carry their own timeout; this bounds the whole request
    let request_timeout = environment.upstream_timeout() + std::time::Duration::from_secs(5);

    let router = router(environment, gateways, image_uploader, settings_store)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout));

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 I-HAVEN admin gateway started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
