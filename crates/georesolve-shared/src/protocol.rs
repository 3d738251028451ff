//! Request and response bodies of the backend REST surface.

use serde::{Deserialize, Serialize};

use crate::models::{EncodedImage, User};
use crate::types::{GeoPoint, Role, Status};

/// `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Response of both auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// `POST /complaints`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub images: Vec<EncodedImage>,
}

impl NewComplaint {
    pub fn new(
        title: String,
        description: String,
        category: String,
        location: GeoPoint,
        images: Vec<EncodedImage>,
    ) -> Self {
        Self {
            title,
            description,
            category,
            latitude: location.latitude(),
            longitude: location.longitude(),
            images,
        }
    }
}

/// `PUT /complaints/{id}`. Empty strings are sent as-is and clear the field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplaintUpdate {
    pub status: Status,
    pub assigned_to: String,
    pub resolution_notes: String,
}

/// Error body convention: `detail` is shown verbatim when it is a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Invalid email or password"}"#).unwrap();
        assert_eq!(body.message(), Some("Invalid email or password"));
    }

    #[test]
    fn test_error_body_structured_detail_is_ignored() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","email"],"msg":"bad"}]}"#).unwrap();
        assert_eq!(body.message(), None);
    }

    #[test]
    fn test_new_complaint_wire_shape() {
        let body = NewComplaint::new(
            "Pothole".into(),
            "Deep".into(),
            "Roads".into(),
            GeoPoint::new(16.5, 80.6).unwrap(),
            vec![],
        );
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["latitude"], 16.5);
        assert_eq!(value["images"], serde_json::json!([]));
    }
}
