//! Reqwest-backed repository adapter.
//!
//! Owns transport details only: URL building, bearer credentials, status
//! mapping and JSON decoding. No retries; timeouts are the transport's.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use georesolve_shared::constants::API_PREFIX;
use georesolve_shared::protocol::{
    AuthResponse, ComplaintUpdate, ErrorBody, LoginRequest, NewComplaint, RegisterRequest,
};
use georesolve_shared::{
    Category, CategoryCount, Complaint, ComplaintId, GeoPoint, Stats, User, UserId,
};

use super::{AuthApi, ComplaintRepository, ListQuery};
use crate::error::{ClientError, Result};
use crate::state::SessionContext;

pub struct HttpBackend {
    client: Client,
    base: Url,
    session: Arc<SessionContext>,
}

impl HttpBackend {
    /// `backend_url` is the server root; endpoints live under `/api`.
    pub fn new(backend_url: &str, session: Arc<SessionContext>) -> Result<Self> {
        let base = format!("{}{}/", backend_url.trim_end_matches('/'), API_PREFIX);
        let base = Url::parse(&base).map_err(|e| ClientError::Url(format!("{base}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            base,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Url(format!("{path}: {e}")))
    }

    /// Attach the persisted bearer credential. Fails without touching the
    /// network when there is no session.
    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::Unauthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.authed(self.client.get(self.url(path)?))?;
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().clone();
    let body = response.bytes().await?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message().map(str::to_string));
        warn!(%url, %status, detail = ?detail, "backend request failed");
        return Err(map_status(status, detail));
    }

    debug!(%url, %status, bytes = body.len(), "backend request ok");
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(format!("{url}: {e}")))
}

fn map_status(status: StatusCode, detail: Option<String>) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth { status, detail },
        _ => ClientError::Api { status, detail },
    }
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        send(self.client.post(self.url("auth/login")?).json(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        send(self.client.post(self.url("auth/register")?).json(request)).await
    }

    async fn me(&self) -> Result<User> {
        self.get_json("auth/me").await
    }
}

#[async_trait]
impl ComplaintRepository for HttpBackend {
    async fn list_complaints(&self, query: &ListQuery) -> Result<Vec<Complaint>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        let request = self.client.get(self.url("complaints")?).query(&params);
        send(self.authed(request)?).await
    }

    async fn user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>> {
        self.get_json(&format!("complaints/user/{user_id}")).await
    }

    async fn get_complaint(&self, id: ComplaintId) -> Result<Complaint> {
        self.get_json(&format!("complaints/{id}")).await
    }

    async fn nearby_complaints(&self, center: GeoPoint, radius_m: f64) -> Result<Vec<Complaint>> {
        let request = self.client.get(self.url("complaints/nearby")?).query(&[
            ("latitude", center.latitude()),
            ("longitude", center.longitude()),
            ("radius", radius_m),
        ]);
        send(self.authed(request)?).await
    }

    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint> {
        let request = self.client.post(self.url("complaints")?).json(complaint);
        send(self.authed(request)?).await
    }

    async fn update_complaint(
        &self,
        id: ComplaintId,
        update: &ComplaintUpdate,
    ) -> Result<Complaint> {
        let request = self
            .client
            .put(self.url(&format!("complaints/{id}"))?)
            .json(update);
        send(self.authed(request)?).await
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.get_json("categories").await
    }

    async fn stats(&self) -> Result<Stats> {
        self.get_json("analytics/stats").await
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryCount>> {
        self.get_json("analytics/category-breakdown").await
    }
}
