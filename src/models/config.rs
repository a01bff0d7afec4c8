//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::DEFAULT_PAGE_SIZE;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by every list of the dashboard.
pub struct DashboardConfig {
    /// Backend API root, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Credential attached to every request when present.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Catalog resources to work with; all of them when empty.
    #[serde(default)]
    pub resources: Vec<String>,
}

#[cfg(feature = "http")]
impl DashboardConfig {
    /// Loads `<dir>/default.yaml`, then `<dir>/<app_env>.yaml` if present,
    /// then `APP_`-prefixed environment variables.
    pub fn load(config_dir: &str, app_env: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(&format!("{config_dir}/default")))
            .add_source(
                config::File::with_name(&format!("{config_dir}/{app_env}")).required(false),
            )
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
