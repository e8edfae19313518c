mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind, str::FromStr};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Builds the gateway configuration: `.env`, then the YAML file, then
/// environment overrides.
pub async fn load() -> Result<Config> {
    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();

    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => from_yaml(&config_str)?,
        Err(e) if e.kind() == ErrorKind::NotFound && explicit_path.is_none() => {
            debug!("No {} found, using built-in defaults", config_path);
            Config::default()
        }
        Err(e) => {
            return Err(Error::config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            )));
        }
    };

    config.apply_overrides(|key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

pub fn from_yaml(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

impl Config {
    /// Applies environment-style overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NVIDIA_API_URL") {
            self.vision.api_url = url;
        }
        if let Some(key) = lookup("NVIDIA_API_KEY") {
            self.vision.api_key = key;
        }
        if let Some(model) = lookup("VISION_MODEL") {
            self.vision.model = model;
        }
        if let Some(secs) = lookup("VISION_TIMEOUT_SECS") {
            self.vision.timeout_secs = parse_var("VISION_TIMEOUT_SECS", &secs)?;
        }
        if let Some(host) = lookup("BACKEND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BACKEND_PORT") {
            self.server.port = parse_var("BACKEND_PORT", &port)?;
        }
        if let Some(limit) = lookup("MAX_IMAGE_BYTES") {
            self.upload.max_image_bytes = Some(parse_var("MAX_IMAGE_BYTES", &limit)?);
        }
        if let Some(dir) = lookup("UPLOAD_TEMP_DIR") {
            self.upload.temp_dir = Some(dir.into());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.vision.api_key.trim().is_empty() {
            return Err(Error::config(
                "Vision API key is missing. Set NVIDIA_API_KEY or vision.api_key",
            ));
        }
        if self.vision.api_url.trim().is_empty() {
            return Err(Error::config("Vision API URL must not be empty"));
        }
        if self.vision.timeout_secs == 0 {
            return Err(Error::config("vision.timeout_secs must be greater than zero"));
        }
        if self.upload.max_image_bytes == Some(0) {
            return Err(Error::config("upload.max_image_bytes must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {}: '{}'", name, value)))
}
