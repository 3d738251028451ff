use georesolve_shared::constants::BROWSE_ZOOM;
use georesolve_shared::{Complaint, GeoPoint};
use tracing::debug;

use super::widget::{MapWidget, Marker};

/// Browsing map: one status-coloured marker per complaint.
///
/// Only the view centre is mutable; complaint data is never touched.
#[derive(Debug, Clone)]
pub struct ComplaintMap {
    center: GeoPoint,
    zoom: u8,
}

impl Default for ComplaintMap {
    fn default() -> Self {
        Self {
            center: GeoPoint::fallback(),
            zoom: BROWSE_ZOOM,
        }
    }
}

impl ComplaintMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Move the view to a device fix.
    pub fn recenter(&mut self, center: GeoPoint) {
        self.center = center;
    }

    pub fn markers(complaints: &[Complaint]) -> Vec<Marker> {
        complaints.iter().map(Marker::for_complaint).collect()
    }

    /// Redraw `widget` from scratch for `complaints`.
    pub fn render(&self, complaints: &[Complaint], widget: &mut dyn MapWidget) {
        widget.set_view(self.center, self.zoom);
        widget.clear_markers();
        for marker in Self::markers(complaints) {
            widget.add_marker(marker);
        }
        debug!(markers = complaints.len(), center = %self.center, "complaint map rendered");
    }
}
