//! Platform feature flags.
//!
//! [`InMemorySettingsStore`] keeps the flags in process memory: they reset
//! on restart and are only consistent within one instance. It stands in for
//! a durable store during development and in tests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use validator::Validate;

/// Boolean feature flags shown on the settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSettings {
    /// Reject non-admin traffic with a maintenance notice
    pub maintenance_mode: bool,
    /// Allow new users to sign up
    pub user_registration: bool,
    /// Send transactional emails
    pub email_notifications: bool,
    /// Require a second factor at login
    pub two_factor_auth: bool,
    /// Require identity verification before payouts
    pub kyc_verification: bool,
    /// Pay merchants out without manual approval
    pub auto_payouts: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            user_registration: true,
            email_notifications: true,
            two_factor_auth: false,
            kyc_verification: true,
            auto_payouts: false,
        }
    }
}

/// Partial update; unset flags keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub maintenance_mode: Option<bool>,
    pub user_registration: Option<bool>,
    pub email_notifications: Option<bool>,
    pub two_factor_auth: Option<bool>,
    pub kyc_verification: Option<bool>,
    pub auto_payouts: Option<bool>,
}

impl PlatformSettings {
    /// Settings with every set flag of `patch` applied
    #[must_use]
    pub fn merged(self, patch: SettingsPatch) -> Self {
        Self {
            maintenance_mode: patch.maintenance_mode.unwrap_or(self.maintenance_mode),
            user_registration: patch.user_registration.unwrap_or(self.user_registration),
            email_notifications: patch
                .email_notifications
                .unwrap_or(self.email_notifications),
            two_factor_auth: patch.two_factor_auth.unwrap_or(self.two_factor_auth),
            kyc_verification: patch.kyc_verification.unwrap_or(self.kyc_verification),
            auto_payouts: patch.auto_payouts.unwrap_or(self.auto_payouts),
        }
    }
}

/// Trait for reading and updating platform settings
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings
    async fn get(&self) -> PlatformSettings;

    /// Applies `patch` and returns the resulting settings
    async fn update(&self, patch: SettingsPatch) -> PlatformSettings;
}

/// Process-local settings store
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<PlatformSettings>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new(initial: PlatformSettings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

#[async_trait::async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self) -> PlatformSettings {
        *self.settings.read().await
    }

    async fn update(&self, patch: SettingsPatch) -> PlatformSettings {
        let mut settings = self.settings.write().await;
        *settings = settings.merged(patch);
        tracing::info!(settings = ?*settings, "Platform settings updated");
        *settings
    }
}
