//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client runs against a local backend
//! with no configuration at all.

use std::path::PathBuf;

use georesolve_shared::GeoPoint;

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend root; REST endpoints live under `{backend_url}/api`.
    /// Env: `BACKEND_URL`
    /// Default: `http://localhost:8001`
    pub backend_url: String,

    /// Directory holding `georesolve.db`.
    /// Env: `GEORESOLVE_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Position reported by the device geolocation capability, as `lat,lng`.
    /// Env: `GEORESOLVE_LOCATION`
    /// Default: unset (geolocation unavailable).
    pub location: Option<GeoPoint>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".to_string(),
            data_dir: None,
            location: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("BACKEND_URL") {
            let url = url.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                config.backend_url = url.trim_end_matches('/').to_string();
            } else {
                tracing::warn!(value = %url, "Invalid BACKEND_URL, using default");
            }
        }

        if let Some(dir) = lookup("GEORESOLVE_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(raw) = lookup("GEORESOLVE_LOCATION") {
            match raw.parse::<GeoPoint>() {
                Ok(point) => config.location = Some(point),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Invalid GEORESOLVE_LOCATION, ignoring");
                }
            }
        }

        config
    }
}
