use codelens_client::ClientOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SERVICE_URL_ENV: &str = "CODELENS_SERVICE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub analyze: AnalyzeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub top_k: Option<u32>,
    pub chunk_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: codelens_client::api::DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: None,
        }
    }
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            top_k: None,
            chunk_limit: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SERVICE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.service.base_url = url;
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.service.base_url.clone(),
            connect_timeout: Duration::from_secs(self.service.connect_timeout_secs),
            request_timeout: self.service.request_timeout_secs.map(Duration::from_secs),
            top_k: self.analyze.top_k,
        }
    }
}
