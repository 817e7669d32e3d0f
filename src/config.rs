use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::{DecisionError, Result};

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Log filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "decision_helper=info,tower_http=info";

/// Main configuration structure loaded from decision_helper.toml and environment variables.
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub server: ServerConfig,
}

/// Remote chat-completion API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_ms: u64,
    /// Bearer credential; only ever taken from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl Config {
    /// Load `.env` (or DECISION_ENV_FILE), then the TOML file named by
    /// DECISION_HELPER_CONFIG (default "decision_helper.toml"), then env overrides.
    /// A missing default file falls back to built-in defaults.
    pub fn load() -> Result<Self> {
        let env_file = std::env::var("DECISION_ENV_FILE").ok();
        Self::load_with_env_file(env_file.as_deref())
    }

    /// Same as [`Config::load`] with an explicit env file path
    pub fn load_with_env_file(env_file: Option<&str>) -> Result<Self> {
        load_env_file(env_file);
        let config_path = std::env::var("DECISION_HELPER_CONFIG")
            .unwrap_or_else(|_| "decision_helper.toml".to_string());
        Self::build(&config_path, false)
    }

    /// Load using an explicit TOML path, which must exist
    pub fn load_from(config_path: &str) -> Result<Self> {
        load_env_file(std::env::var("DECISION_ENV_FILE").ok().as_deref());
        Self::build(config_path, true)
    }

    fn build(config_path: &str, required: bool) -> Result<Self> {
        let mut config: Config = match std::fs::read_to_string(config_path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
            Err(e) => {
                return Err(DecisionError::Config {
                    message: format!("cannot read config file {}: {}", config_path, e),
                });
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment-first overrides
    pub fn apply_env_overrides(&mut self) {
        self.model.api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if let Ok(url) = std::env::var("DECISION_API_URL") {
            tracing::debug!("DECISION_API_URL env override applied");
            self.model.api_url = url;
        }
        if let Ok(model) = std::env::var("DECISION_MODEL") {
            tracing::debug!("DECISION_MODEL env override applied");
            self.model.model = model;
        }
        if let Ok(v) = std::env::var("DECISION_TIMEOUT_MS") {
            match v.parse::<u64>() {
                Ok(ms) => self.model.timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring unparseable DECISION_TIMEOUT_MS '{}'", v),
            }
        }
        if let Ok(v) = std::env::var("DECISION_HTTP_BIND") {
            match v.parse::<SocketAddr>() {
                Ok(bind) => self.server.bind = bind,
                Err(_) => tracing::warn!("Ignoring unparseable DECISION_HTTP_BIND '{}'", v),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.timeout_ms == 0 {
            return Err(DecisionError::Config {
                message: "model timeout_ms must be > 0".to_string(),
            });
        }
        if !self.model.api_url.starts_with("http://") && !self.model.api_url.starts_with("https://")
        {
            return Err(DecisionError::Config {
                message: format!(
                    "API URL '{}' must start with http:// or https://",
                    self.model.api_url
                ),
            });
        }
        Ok(())
    }
}

/// Load environment variables from DECISION_ENV_FILE if given, otherwise ./.env.
/// Variables already present in the process environment are not overridden.
pub fn load_env_file(env_file: Option<&str>) {
    match env_file {
        Some(path) => {
            if let Err(e) = dotenvy::from_path(path) {
                tracing::warn!("Could not load env file {}: {}", path, e);
            }
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_groq() {
        let config = Config::default();
        assert_eq!(config.model.api_url, DEFAULT_API_URL);
        assert_eq!(config.model.model, "llama-3.3-70b-versatile");
        assert_eq!(config.model.timeout_ms, 30_000);
        assert!(config.model.api_key.is_none());
        assert_eq!(config.server.bind.port(), 5000);
    }

    #[test]
    fn toml_sections_are_partial() {
        let config = Config::from_toml(
            r#"
[model]
model = "llama-3.1-8b-instant"

[server]
bind = "0.0.0.0:8080"
"#,
        )
        .unwrap();
        assert_eq!(config.model.model, "llama-3.1-8b-instant");
        assert_eq!(config.model.api_url, DEFAULT_API_URL);
        assert_eq!(config.server.bind.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn api_key_is_never_read_from_toml() {
        let config = Config::from_toml("[model]\napi_key = \"sk-leaked\"\n").unwrap();
        assert!(config.model.api_key.is_none());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.model.timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(DecisionError::Config { .. })
        ));
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("decision_helper_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn config_path_from_env_file_is_honoured() {
        let dir = scratch_dir("env_order");
        let toml_path = dir.join("from_env.toml");
        std::fs::write(&toml_path, "[model]\nmodel = \"model-from-env-file\"\n").unwrap();
        let env_path = dir.join("test.env");
        std::fs::write(
            &env_path,
            format!("DECISION_HELPER_CONFIG={}\n", toml_path.display()),
        )
        .unwrap();

        let config = Config::load_with_env_file(env_path.to_str()).unwrap();
        assert_eq!(config.model.model, "model-from-env-file");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = scratch_dir("missing").join("nope.toml");
        let err = Config::load_from(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DecisionError::Config { .. }), "{err}");
    }

    #[test]
    fn implicit_missing_config_uses_defaults() {
        let missing = scratch_dir("implicit").join("nope.toml");
        let config = Config::build(missing.to_str().unwrap(), false).unwrap();
        assert_eq!(config.model.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut config = Config::default();
        config.model.api_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }
}
