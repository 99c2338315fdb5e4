use config::{Config, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::environment::Environment;

/// Service configuration, layered from `appsettings.{env}.toml` (optional)
/// and `APP`-prefixed environment variables (`APP_SERVER__PORT` and so on).
/// Every field has a default so a bare process starts against a local
/// LM Studio instance.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub chat: ChatSettings,
    pub upload: UploadSettings,
    pub cache: CacheSettings,
}

impl Settings {
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(EnvironmentSource::with_prefix("APP").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

/// Connection to the OpenAI-compatible model server. `label` is the
/// human-readable name stamped onto generated artifacts; `model` is the
/// identifier the backend expects in requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub label: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            model: "qwen2.5-7b-instruct".to_string(),
            label: "Qwen2.5-7B-Instruct".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub system_prompt: String,
    /// Response budget used when a request does not supply its own.
    pub max_tokens: u32,
    pub temperature: f32,
    pub sse_keep_alive_seconds: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful study assistant. Provide clear, concise, \
                            and accurate responses. Be brief and to the point."
                .to_string(),
            max_tokens: 1000,
            temperature: 0.5,
            sse_keep_alive_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub max_file_size_mb: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_seconds: u64,
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 3_600,
            max_entries: 64,
        }
    }
}
