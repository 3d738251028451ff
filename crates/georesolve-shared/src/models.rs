//! Domain models as served by the backend.
//!
//! Every struct derives `Serialize` and `Deserialize` with the backend's
//! field names, so the same types travel over HTTP and into the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ComplaintId, GeoPoint, Role, Status, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The authenticated actor. Immutable for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Complaint
// ---------------------------------------------------------------------------

/// Who filed a complaint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reporter {
    #[serde(rename = "user_id")]
    pub id: UserId,
    #[serde(rename = "user_name")]
    pub name: String,
}

/// An image attached to a complaint, carried as an opaque `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct EncodedImage(pub String);

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared in the data URL header, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
    }
}

/// A citizen-submitted civic issue.
///
/// Status, assignee and resolution notes are only changed by an admin edit;
/// complaints are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub title: String,
    pub description: String,
    /// Name of a [`Category`].
    pub category: String,
    pub status: Status,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(flatten)]
    pub reporter: Reporter,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub images: Vec<EncodedImage>,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A complaint category. The name is unique and doubles as the filter key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Complaint counts, overall and per status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

/// One row of the category breakdown. The backend sorts rows by count,
/// highest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The persisted (credential, actor) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}
