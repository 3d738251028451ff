//! Repository client contracts.
//!
//! [`AuthApi`] and [`ComplaintRepository`] describe the backend REST surface
//! as typed async operations. [`http::HttpBackend`] is the reqwest adapter;
//! tests substitute an in-memory fake.

pub mod http;

use async_trait::async_trait;

use georesolve_shared::protocol::{
    AuthResponse, ComplaintUpdate, LoginRequest, NewComplaint, RegisterRequest,
};
use georesolve_shared::{
    Category, CategoryCount, Complaint, ComplaintId, GeoPoint, Stats, Status, User, UserId,
};

use crate::error::Result;

pub use http::HttpBackend;

/// Optional server-side narrowing of `GET /complaints`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub status: Option<Status>,
    pub category: Option<String>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    /// The actor behind the current bearer credential.
    async fn me(&self) -> Result<User>;
}

/// Complaint, category and analytics operations. All require a session.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Admins see everything; citizens see whatever the backend scopes to them.
    async fn list_complaints(&self, query: &ListQuery) -> Result<Vec<Complaint>>;

    async fn user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>>;

    async fn get_complaint(&self, id: ComplaintId) -> Result<Complaint>;

    async fn nearby_complaints(&self, center: GeoPoint, radius_m: f64) -> Result<Vec<Complaint>>;

    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint>;

    async fn update_complaint(&self, id: ComplaintId, update: &ComplaintUpdate)
        -> Result<Complaint>;

    async fn categories(&self) -> Result<Vec<Category>>;

    async fn stats(&self) -> Result<Stats>;

    async fn category_breakdown(&self) -> Result<Vec<CategoryCount>>;
}

/// Order a freshly fetched collection newest first. Done once per fetch;
/// every derived view keeps this order.
pub fn sort_newest_first(complaints: &mut [Complaint]) {
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
