use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled-in report endpoint, used when neither the config file nor the
/// command line supplies one.
pub const DEFAULT_ENDPOINT: &str =
    "https://script.google.com/macros/s/AKfycbz6cF4wvK0c3c_AW6m0le55qY5p2tzGo3LZ5fFoPWFI3g_-ordlyCLByuw451HMrpZn/exec";

/// Compiled-in shared token. It travels in every submission body and is
/// visible to anyone running the client; it identifies the form, it does not
/// authenticate the sender.
pub const DEFAULT_TOKEN: &str = "AIS2025WORKREPORT";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("worklog-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".worklog-cli")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, or defaults when it doesn't exist. An explicit
    /// `path` override must exist; the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::get_config_path()?, false),
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {:?}", config_path);
            }
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(
            "Loaded config (endpoint override: {}, token override: {})",
            config.endpoint.is_some(),
            config.token.is_some()
        );
        Ok(config)
    }
}
