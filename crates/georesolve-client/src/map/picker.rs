use georesolve_shared::constants::PICKER_ZOOM;
use georesolve_shared::{GeoPoint, ValidationError};
use tracing::{debug, warn};

use super::geolocation::GeolocationError;
use super::widget::{MapWidget, Marker};

/// Reporting map: holds the single picked point.
///
/// The point is set by a map click or by a device fix; a fix also recenters
/// the view. A failed fix leaves everything as it was.
#[derive(Debug, Clone)]
pub struct LocationPicker {
    center: GeoPoint,
    picked: Option<GeoPoint>,
}

impl Default for LocationPicker {
    fn default() -> Self {
        Self {
            center: GeoPoint::fallback(),
            picked: None,
        }
    }
}

impl LocationPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn picked(&self) -> Option<GeoPoint> {
        self.picked
    }

    /// Map click at raw widget coordinates.
    pub fn on_click(&mut self, latitude: f64, longitude: f64) -> Result<GeoPoint, ValidationError> {
        let point = GeoPoint::new(latitude, longitude)?;
        self.picked = Some(point);
        debug!(point = %point, "location picked");
        Ok(point)
    }

    /// Outcome of a device geolocation request. Returns whether a point was
    /// applied.
    pub fn on_geolocation(&mut self, fix: Result<GeoPoint, GeolocationError>) -> bool {
        match fix {
            Ok(point) => {
                self.center = point;
                self.picked = Some(point);
                debug!(point = %point, "location detected");
                true
            }
            Err(e) => {
                warn!(error = %e, "geolocation failed, manual selection required");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.picked = None;
    }

    pub fn render(&self, widget: &mut dyn MapWidget) {
        widget.set_view(self.center, PICKER_ZOOM);
        widget.clear_markers();
        if let Some(point) = self.picked {
            widget.add_marker(Marker::picked(point));
        }
    }
}
