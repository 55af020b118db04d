use std::sync::Arc;

use aide::axum::{routing::get, ApiRouter};
use axum::{Extension, Json};
use tracing::instrument;

use crate::{
    settings::{PlatformSettings, SettingsPatch, SettingsStore},
    types::ValidatedJson,
};

/// Creates the settings router
pub fn handler() -> ApiRouter {
    ApiRouter::new().api_route(
        "/api/settings",
        get(get_settings).put(update_settings),
    )
}

/// Current platform feature flags
#[instrument(skip(store))]
async fn get_settings(
    Extension(store): Extension<Arc<dyn SettingsStore>>,
) -> Json<PlatformSettings> {
    Json(store.get().await)
}

/// Applies a partial update; flags not present keep their value
#[instrument(skip(store))]
async fn update_settings(
    Extension(store): Extension<Arc<dyn SettingsStore>>,
    ValidatedJson(patch): ValidatedJson<SettingsPatch>,
) -> Json<PlatformSettings> {
    Json(store.update(patch).await)
}
