//! Configuration management for udm-dash using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default backend API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default poll interval for the matching views, in seconds.
pub const DEFAULT_MATCHING_POLL_SECS: u64 = 10;

/// Default poll interval for the UDM views, in seconds.
pub const DEFAULT_UDM_POLL_SECS: u64 = 30;

const ENV_API_URL: &str = "UDM_DASH_API_URL";
const ENV_TIMEOUT: &str = "UDM_DASH_TIMEOUT";

/// Errors while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Base URL of the backend API, including the `/api` prefix.
    pub api_url: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub request_timeout: Option<u64>,
    /// User agent for HTTP requests.
    pub user_agent: String,
    pub matching_poll_secs: u64,
    pub udm_poll_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            user_agent: format!("udm-dash/{}", env!("CARGO_PKG_VERSION")),
            matching_poll_secs: DEFAULT_MATCHING_POLL_SECS,
            udm_poll_secs: DEFAULT_UDM_POLL_SECS,
        }
    }
}

impl Settings {
    /// Apply `UDM_DASH_*` overrides from `lookup`.
    ///
    /// Unparseable timeouts are ignored with a warning. A timeout of `0`
    /// clears the timeout.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|s| !s.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.request_timeout = None,
                Ok(secs) => self.request_timeout = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT, raw),
            }
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Backend API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_poll_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udm_poll_secs: Option<u64>,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Finds `udm-dash.{toml,yaml,yml,json}` in the standard locations.
    pub async fn load() -> Self {
        match prefer::load("udm-dash").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("{}; using defaults", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            // No config file found
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension; anything unknown is read as JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply configuration to settings. Unset fields keep their current value.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref api_url) = self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = (timeout > 0).then_some(timeout);
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(secs) = self.matching_poll_secs.filter(|s| *s > 0) {
            settings.matching_poll_secs = secs;
        }
        if let Some(secs) = self.udm_poll_secs.filter(|s| *s > 0) {
            settings.udm_poll_secs = secs;
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// API URL from the command line; beats every other source.
    pub api_url: Option<String>,
}

/// Resolve settings: defaults, then config file, then environment, then flags.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            Config::load_from_path(Path::new(&expanded)).await?
        }
        None => Config::load().await,
    };

    let settings = resolve_settings(&config, |key| std::env::var(key).ok(), &options);
    Ok((settings, config))
}

/// Merge every source into concrete settings.
pub fn resolve_settings<F>(config: &Config, env: F, options: &LoadOptions) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.apply_env(env);
    if let Some(ref url) = options.api_url {
        settings.api_url = url.clone();
    }
    settings
}
