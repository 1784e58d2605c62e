use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

use crate::service::relay::prompt::SYSTEM_PROMPT;

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "SUPPORT_RELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/app.yml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout: u64,
    pub client_request_timeout_secs: u64,
    pub log_config: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            shutdown_timeout: 30,
            client_request_timeout_secs: 30,
            log_config: "config/log4rs.yml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RelayConfig {
    /// Path the relay endpoint is mounted on.
    pub path: String,
    pub gateway_url: String,
    pub model: String,
    /// Name of the environment variable holding the gateway secret.
    pub api_key_env: String,
    pub connect_timeout_secs: u64,
    /// Longest silence tolerated between two upstream chunks.
    pub idle_timeout_secs: u64,
    /// Optional file replacing the built-in system prompt.
    pub system_prompt_file: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            path: "/functions/v1/support-chat".to_string(),
            gateway_url: "https://ai.gateway.lovable.dev/v1/chat/completions".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: "LOVABLE_API_KEY".to_string(),
            connect_timeout_secs: 10,
            idle_timeout_secs: 60,
            system_prompt_file: None,
        }
    }
}

impl RelayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Gateway secret from the configured environment variable. Blank values
    /// count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.trim().is_empty())
    }

    pub fn system_prompt(&self) -> anyhow::Result<String> {
        match &self.system_prompt_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read system prompt file {}", path)),
            None => Ok(SYSTEM_PROMPT.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_headers: Vec<String>,
    pub allow_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: vec![
                "authorization".to_string(),
                "x-client-info".to_string(),
                "apikey".to_string(),
                "content-type".to_string(),
            ],
            allow_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub relay: RelayConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let config_file = std::fs::File::open(config_path)
            .with_context(|| format!("Failed to open config file {}", config_path))?;
        let config: Self = serde_yaml::from_reader(config_file)?;
        Ok(config)
    }

    /// Path from `SUPPORT_RELAY_CONFIG`, falling back to `config/app.yml`.
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}
