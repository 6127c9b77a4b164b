//! Runtime configuration, read from `BANANA_*` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::api::{ApiConfig, DeploymentTarget};
use crate::application::{DialogSaveTarget, DirectorySaveTarget, SaveTarget};

const ENV_PREFIX: &str = "BANANA";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// e.g. `BANANA_API_BASE_URL=https://banana-api.up.railway.app`
    pub api_base_url: String,
    /// `local` or `hosted`; guessed from the base URL when unset.
    pub deployment: Option<DeploymentTarget>,
    pub download_dir: Option<PathBuf>,
    pub ask_save_location: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: ApiConfig::default().base_url,
            deployment: None,
            download_dir: None,
            ask_save_location: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            deployment: self.deployment,
        }
    }

    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn save_target(&self) -> Arc<dyn SaveTarget> {
        if self.ask_save_location {
            Arc::new(DialogSaveTarget::new(Some(self.resolved_download_dir())))
        } else {
            Arc::new(DirectorySaveTarget::new(self.resolved_download_dir()))
        }
    }
}
