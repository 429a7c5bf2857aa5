use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::api::{Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::errors::{Result, SkyringError};
use crate::geo::GeoPoint;

/// Environment fallback for the basic-auth username.
pub const ENV_USERNAME: &str = "OPENSKY_USERNAME";
/// Environment fallback for the basic-auth password.
pub const ENV_PASSWORD: &str = "OPENSKY_PASSWORD";

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub location: LocationConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,  // center of the watch circle
    pub longitude: f64,
    pub radius_km: f64, // range queried around the center
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            username: None,
            password: None,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        // San Francisco, 10 km out
        LocationConfig {
            latitude: 37.7749,
            longitude: -122.4194,
            radius_km: 10.0,
        }
    }
}

impl Config {
    /// Reads a TOML config from an explicit path. Sections and fields that
    /// are absent fall back to their defaults; an unreadable or unparsable
    /// file is an error, not a silent default.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SkyringError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| SkyringError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Basic-auth credentials, if any. An explicit config pair wins; the
    /// `OPENSKY_USERNAME` / `OPENSKY_PASSWORD` environment pair is the
    /// fallback. Half a pair counts as anonymous.
    pub fn credentials(&self) -> Option<Credentials> {
        if let (Some(username), Some(password)) = (&self.api.username, &self.api.password) {
            return Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            });
        }
        match (env::var(ENV_USERNAME), env::var(ENV_PASSWORD)) {
            (Ok(username), Ok(password)) => Some(Credentials { username, password }),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    pub fn center(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.location.latitude, self.location.longitude)
    }
}
