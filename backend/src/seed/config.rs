//! Demo seeding configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_COMMUNITY_COUNT: usize = 2;

/// Configuration values controlling demo data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOUNDLINK_SEED")]
pub struct SeedSettings {
    /// Enable demo data seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Username of the provisioned superadmin account.
    pub admin_username: Option<String>,
    /// Optional override for the number of demo communities created.
    #[ortho_config(file_key = "community_count")]
    pub count: Option<usize>,
}

impl SeedSettings {
    /// Return the configured admin username, falling back to the default.
    #[must_use]
    pub fn admin_username(&self) -> &str {
        self.admin_username.as_deref().unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    /// Return the configured community count, falling back to the default.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COMMUNITY_COUNT)
    }
}
