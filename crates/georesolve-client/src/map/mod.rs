//! Geospatial map renderer.
//!
//! Tile drawing is the job of a [`MapWidget`]; this module decides what goes
//! on it. [`ComplaintMap`] is the read-only browsing mode (one marker per
//! complaint) and [`LocationPicker`] is the reporting mode (one picked point).

pub mod complaints;
pub mod geojson;
pub mod geolocation;
pub mod picker;
pub mod widget;

pub use complaints::ComplaintMap;
pub use geojson::GeoJsonWidget;
pub use geolocation::{FixedGeolocator, GeolocationError, Geolocator, NoGeolocation};
pub use picker::LocationPicker;
pub use widget::{MapWidget, Marker, MarkerKind, Popup};

use georesolve_shared::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres (haversine).
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude().to_radians(), b.latitude().to_radians());
    let dlat = lat2 - lat1;
    let dlng = (b.longitude() - a.longitude()).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let here = GeoPoint::fallback();
        assert_eq!(distance_m(here, here), 0.0);

        // One degree of latitude is roughly 111 km.
        let north = GeoPoint::new(here.latitude() + 1.0, here.longitude()).unwrap();
        let d = distance_m(here, north);
        assert!((d - 111_195.0).abs() < 100.0, "{d}");
    }
}
