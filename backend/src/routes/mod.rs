mod admin;
mod docs;
mod health;
mod proxy;
mod session;
mod settings;
mod upload;

use aide::axum::{routing::get, ApiRouter};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .merge(session::handler())
        .merge(settings::handler())
        .merge(admin::handler())
        .merge(upload::handler())
        .merge(proxy::handler())
}
