//! Device geolocation capability.

use async_trait::async_trait;
use thiserror::Error;

use georesolve_shared::GeoPoint;

use crate::error::ErrorKind;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable")]
    Unavailable,

    #[error("Location request timed out")]
    Timeout,
}

impl GeolocationError {
    /// Never fatal: callers fall back to manual selection.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::PartialCapabilityFailure
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError>;
}

/// Reports a configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub GeoPoint);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Ok(self.0)
    }
}

/// A device without a location capability, or one that refuses to share it.
#[derive(Debug, Clone, Copy)]
pub struct NoGeolocation(pub GeolocationError);

impl Default for NoGeolocation {
    fn default() -> Self {
        Self(GeolocationError::Unavailable)
    }
}

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Err(self.0)
    }
}

/// Geolocator for an optional configured position.
pub fn from_config(location: Option<GeoPoint>) -> Box<dyn Geolocator> {
    match location {
        Some(point) => Box::new(FixedGeolocator(point)),
        None => Box::new(NoGeolocation::default()),
    }
}
