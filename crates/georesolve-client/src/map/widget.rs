use serde::Serialize;

use georesolve_shared::{Complaint, GeoPoint, Status};

/// What a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "status")]
pub enum MarkerKind {
    Complaint(Status),
    /// The reporter's picked point; drawn with the widget's default pin.
    Picked,
}

impl MarkerKind {
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Complaint(status) => Some(status.color()),
            Self::Picked => None,
        }
    }
}

/// Detail bubble shown when a complaint marker is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub category: String,
    pub reporter: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub kind: MarkerKind,
    pub popup: Option<Popup>,
}

impl Marker {
    pub fn for_complaint(complaint: &Complaint) -> Self {
        Self {
            position: complaint.location,
            kind: MarkerKind::Complaint(complaint.status),
            popup: Some(Popup {
                title: complaint.title.clone(),
                category: complaint.category.clone(),
                reporter: complaint.reporter.name.clone(),
                status: complaint.status,
            }),
        }
    }

    pub fn picked(position: GeoPoint) -> Self {
        Self {
            position,
            kind: MarkerKind::Picked,
            popup: None,
        }
    }
}

/// The pan/zoom/marker surface a front end provides.
pub trait MapWidget {
    fn set_view(&mut self, center: GeoPoint, zoom: u8);

    fn clear_markers(&mut self);

    fn add_marker(&mut self, marker: Marker);
}
