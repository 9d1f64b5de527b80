//! Server configuration from the environment.
//!
//! `.env` is loaded first (if present), then an optional `config.toml`, then
//! process environment variables, which win.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::models::MapSettings;

pub const DEFAULT_TILE_URL: &str =
    "https://api.maptiler.com/maps/streets-v2/256/{z}/{x}/{y}.png?key={key}";
pub const DEFAULT_REVALIDATE_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize, Default)]
struct RawSettings {
    site_url: Option<String>,
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    maps_key: Option<String>,
    map_tile_url: Option<String>,
    session_revalidate_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Public origin of this site, without trailing slash.
    pub site_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub maps_key: String,
    pub map_tile_url: String,
    pub session_revalidate_secs: u64,
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn absolute_url(value: String, key: &'static str) -> Result<String, ConfigError> {
    url::Url::parse(&value).map_err(|e| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })?;
    Ok(value.trim_end_matches('/').to_string())
}

impl Settings {
    /// Read settings from `.env`, `config.toml` and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("map_tile_url", DEFAULT_TILE_URL)?
            .set_default("session_revalidate_secs", DEFAULT_REVALIDATE_SECS)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawSettings = config.try_deserialize()?;

        let map_tile_url = raw
            .map_tile_url
            .unwrap_or_else(|| DEFAULT_TILE_URL.to_string());
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !map_tile_url.contains(placeholder) {
                return Err(ConfigError::Invalid {
                    key: "MAP_TILE_URL",
                    message: format!("missing {placeholder} placeholder"),
                });
            }
        }

        Ok(Self {
            site_url: absolute_url(required(raw.site_url, "SITE_URL")?, "SITE_URL")?,
            supabase_url: absolute_url(
                required(raw.supabase_url, "SUPABASE_URL")?,
                "SUPABASE_URL",
            )?,
            supabase_anon_key: required(raw.supabase_anon_key, "SUPABASE_ANON_KEY")?,
            maps_key: required(raw.maps_key, "MAPS_KEY")?,
            map_tile_url,
            session_revalidate_secs: raw
                .session_revalidate_secs
                .unwrap_or(DEFAULT_REVALIDATE_SECS),
        })
    }

    pub fn map_settings(&self) -> MapSettings {
        MapSettings::new(self.map_tile_url.clone(), self.maps_key.clone())
    }
}
