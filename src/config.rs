//! Runtime configuration loaded from the environment.
//!
//! Sensible defaults for local development, environment overrides for
//! deployments. The compiled-in API keys exist so the server starts out
//! of the box; production deployments must set `TASKDECK_API_KEYS`.

use std::env;
use std::time::Duration;
use tracing::warn;

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8787;

const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_ENHANCE_URL: &str = "https://n8n.example.com/webhook/enhance";
const DEFAULT_CHAT_URL: &str = "https://n8n.example.com/webhook/chatbot";
const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 15_000;

/// Development-only placeholder keys, never for production use.
const DEV_API_KEYS: &str = "taskdeck-dev-key-1,taskdeck-dev-key-2";

/// Outbound webhook endpoints and transport policy.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub enhance_url: String,
    pub chat_url: String,
    pub timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enhance_url: DEFAULT_ENHANCE_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_WEBHOOK_TIMEOUT_MS),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to.
    pub bind: String,
    /// Port for the HTTP listener.
    pub port: u16,
    /// Bearer API keys accepted on the /api routes.
    pub api_keys: Vec<String>,
    pub webhooks: WebhookConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            api_keys: parse_key_list(DEV_API_KEYS),
            webhooks: WebhookConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `TASKDECK_*` environment variables,
    /// falling back to development defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(bind) = env::var("TASKDECK_BIND") {
            config.bind = bind;
        }
        if let Ok(port) = env::var("TASKDECK_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        match env::var("TASKDECK_API_KEYS") {
            Ok(keys) if !keys.trim().is_empty() => {
                config.api_keys = parse_key_list(&keys);
            }
            _ => {
                warn!(
                    "TASKDECK_API_KEYS not set, using development keys (not for production!)"
                );
            }
        }

        if let Ok(url) = env::var("TASKDECK_ENHANCE_URL") {
            config.webhooks.enhance_url = url;
        }
        if let Ok(url) = env::var("TASKDECK_CHAT_URL") {
            config.webhooks.chat_url = url;
        }
        if let Ok(ms) = env::var("TASKDECK_WEBHOOK_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.webhooks.timeout = Duration::from_millis(ms);
            }
        }

        config
    }
}

/// Split a comma-separated key list, trimming whitespace and dropping
/// empty entries.
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
