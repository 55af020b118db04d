use std::sync::Arc;

use ihaven_gateway::{
    cloudinary::{CloudinaryClient, ImageUploader, UnconfiguredUploader, CLOUDINARY_API_BASE_URL},
    gateway::BackendGateways,
    server,
    settings::InMemorySettingsStore,
    types::Environment,
};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Production/staging export traces to Datadog; development logs to stdout.
    // The guard must stay alive for the duration of the program.
    let (_guard, tracer_shutdown) = match environment {
        Environment::Production | Environment::Staging => {
            let (guard, tracer_shutdown) = datadog_tracing::init()?;
            (Some(guard), Some(tracer_shutdown))
        }
        Environment::Development => {
            fmt()
                .with_env_filter(
                    EnvFilter::builder()
                        .with_default_directive(
                            LevelFilter::from_level(environment.tracing_level()).into(),
                        )
                        .from_env_lossy(),
                )
                .init();
            (None, None)
        }
    };

    tracing::info!("Starting admin gateway in {:?} environment", environment);

    let gateways = BackendGateways::from_environment(&environment)?;
    tracing::info!(
        admin = gateways.admin.base_url(),
        public = gateways.public.base_url(),
        "✅ Initialized backend gateways"
    );

    let image_uploader: Arc<dyn ImageUploader> = match environment.cloudinary_config() {
        Some(config) => Arc::new(CloudinaryClient::new(
            config,
            CLOUDINARY_API_BASE_URL,
            environment.upstream_timeout(),
        )?),
        None => {
            tracing::warn!("Cloudinary credentials missing, /api/upload is disabled");
            Arc::new(UnconfiguredUploader)
        }
    };

    // Development placeholder: settings live only as long as this process
    let settings_store = Arc::new(InMemorySettingsStore::default());

    let result = server::start(environment, gateways, image_uploader, settings_store).await;

    if let Some(tracer_shutdown) = tracer_shutdown {
        tracer_shutdown.shutdown();
    }

    result
}
