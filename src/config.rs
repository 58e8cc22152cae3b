use std::{fmt, path::PathBuf, time::Duration};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1";

#[derive(Debug, Default)]
pub enum ConfigLoadOption {
    #[default]
    Default,

    Path(PathBuf),
}

#[derive(Default, Debug, Clone, Deserialize, Serialize)]
pub struct GcpConfig {
    pub project_id: Option<String>,
    pub region: Option<String>,
}

#[derive(Default, Clone, Deserialize, Serialize)]
pub struct SecretsConfig {
    pub access_token: Option<String>,
}

impl fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperationConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for OperationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            poll_interval_ms: 1000,
        }
    }
}

impl OperationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: COMPUTE_ENDPOINT.to_string(),
        }
    }
}

#[derive(Default, Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gcp: GcpConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub operation: OperationConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    pub fn load(option: ConfigLoadOption) -> Result<Self> {
        let figment = Figment::new();

        let config = match option {
            ConfigLoadOption::Default => figment.merge(Serialized::defaults(Self::default())),
            ConfigLoadOption::Path(path) => figment
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path)),
        }
        .merge(Env::prefixed("CHAOSGCP_").split("__"))
        .extract_lossy()?;

        Ok(config)
    }
}
