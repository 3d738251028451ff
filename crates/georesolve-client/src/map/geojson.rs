//! A map widget that records its state and exports it as GeoJSON.
//!
//! Used by the command-line front end, which has no tile renderer of its own.

use serde_json::{json, Map, Value};

use georesolve_shared::GeoPoint;

use super::widget::{MapWidget, Marker};

#[derive(Debug, Clone, Default)]
pub struct GeoJsonWidget {
    view: Option<(GeoPoint, u8)>,
    markers: Vec<Marker>,
}

impl GeoJsonWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<(GeoPoint, u8)> {
        self.view
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// A `FeatureCollection` with one `Point` per marker. The view, when set,
    /// travels as a foreign member.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self.markers.iter().map(feature).collect();
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let (Some((center, zoom)), Some(obj)) = (self.view, collection.as_object_mut()) {
            obj.insert(
                "view".into(),
                json!({ "center": [center.longitude(), center.latitude()], "zoom": zoom }),
            );
        }
        collection
    }
}

fn feature(marker: &Marker) -> Value {
    let mut properties = Map::new();
    if let Some(color) = marker.kind.color() {
        properties.insert("marker-color".into(), Value::from(color));
    }
    if let Some(popup) = &marker.popup {
        properties.insert("title".into(), Value::from(popup.title.clone()));
        properties.insert("category".into(), Value::from(popup.category.clone()));
        properties.insert("reporter".into(), Value::from(popup.reporter.clone()));
        properties.insert("status".into(), Value::from(popup.status.as_str()));
        properties.insert("status_label".into(), Value::from(popup.status.label()));
    }
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [marker.position.longitude(), marker.position.latitude()],
        },
        "properties": properties,
    })
}

impl MapWidget for GeoJsonWidget {
    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}
