use std::{sync::Arc, time::Duration};

use axum::{body::Body, http::Request, response::Response, Router};
use ihaven_gateway::{
    cloudinary::mock::MockImageUploader,
    gateway::{ApiGateway, BackendGateways},
    server,
    settings::InMemorySettingsStore,
    types::Environment,
};
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_ORIGIN: &str = "http://localhost:3000";
pub const UPLOADED_IMAGE_URL: &str = "https://res.cloudinary.com/demo/image/upload/v1/test.png";
/// Nothing listens on the discard port
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router whose gateways point at `{backend_url}/v1-admin` and `{backend_url}/v1`
pub fn build_router(
    backend_url: &str,
    image_uploader: Arc<MockImageUploader>,
    settings_store: Arc<InMemorySettingsStore>,
) -> Router {
    let gateway = |base: &str| {
        Arc::new(
            ApiGateway::new(
                &format!("{backend_url}{base}"),
                TEST_ORIGIN,
                Duration::from_secs(5),
            )
            .expect("Failed to build gateway"),
        )
    };

    let gateways = BackendGateways {
        admin: gateway("/v1-admin"),
        public: gateway("/v1"),
    };

    server::router(
        Environment::Development,
        gateways,
        image_uploader,
        settings_store,
    )
}

/// Router whose backend refuses every connection
pub fn unreachable_backend_router() -> Router {
    setup_test_env();
    build_router(
        UNREACHABLE_BACKEND,
        Arc::new(MockImageUploader::new(UPLOADED_IMAGE_URL)),
        Arc::new(InMemorySettingsStore::default()),
    )
}

/// Router wired to a mock backend that serves both `/v1-admin` and `/v1`
pub struct TestContext {
    pub router: Router,
    pub backend: MockServer,
    pub image_uploader: Arc<MockImageUploader>,
    pub settings_store: Arc<InMemorySettingsStore>,
}

impl TestContext {
    pub async fn new() -> Self {
        setup_test_env();

        let backend = MockServer::start().await;
        let image_uploader = Arc::new(MockImageUploader::new(UPLOADED_IMAGE_URL));
        let settings_store = Arc::new(InMemorySettingsStore::default());

        let router = build_router(
            &backend.uri(),
            image_uploader.clone(),
            settings_store.clone(),
        );

        Self {
            router,
            backend,
            image_uploader,
            settings_store,
        }
    }

    /// Serves the router on a loopback socket and returns its base URL
    pub async fn serve(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Listener has no address");
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        format!("http://{address}")
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond")
    }

    pub async fn send_get_request(&self, route: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(route).method("GET");
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_json_request(
        &self,
        method: &str,
        route: &str,
        payload: serde_json::Value,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder()
            .uri(route)
            .method(method)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::from(payload.to_string())).unwrap())
            .await
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        headers: &[(&str, &str)],
    ) -> Response {
        self.send_json_request("POST", route, payload, headers)
            .await
    }
}
