//! Test fixtures and an in-memory backend.
//!
//! [`FakeBackend`] implements both repository traits against plain vectors and
//! mirrors the backend's rules: bearer tokens, admin-only updates and
//! analytics, `detail` messages, and insertion-ordered listings.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use georesolve_shared::protocol::{
    AuthResponse, ComplaintUpdate, LoginRequest, NewComplaint, RegisterRequest,
};
use georesolve_shared::{
    Category, CategoryCount, CategoryId, Complaint, ComplaintId, GeoPoint, Reporter, Role,
    Session, Stats, Status, User, UserId,
};

use crate::api::{AuthApi, ComplaintRepository, ListQuery};
use crate::error::{ClientError, Result};
use crate::state::SessionContext;

pub fn sample_user(name: &str, role: Role) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
        phone: "+91 90000 00000".to_string(),
        role,
    }
}

pub fn sample_session(role: Role) -> Session {
    Session {
        token: format!("token-{role}"),
        user: sample_user("Tester", role),
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn sample_complaint(title: &str, category: &str, status: Status, minutes: i64) -> Complaint {
    Complaint {
        id: ComplaintId::new(),
        title: title.to_string(),
        description: format!("{title} reported by a resident"),
        category: category.to_string(),
        status,
        location: GeoPoint::fallback(),
        reporter: Reporter {
            id: UserId::new(),
            name: "Resident".to_string(),
        },
        created_at: base_time() + Duration::minutes(minutes),
        updated_at: None,
        assigned_to: None,
        resolution_notes: None,
        images: Vec::new(),
    }
}

/// A complaint as the backend would serialise it.
pub fn complaint_json(title: &str, status: &str) -> Value {
    json!({
        "id": ComplaintId::new(),
        "user_id": UserId::new(),
        "user_name": "Resident",
        "title": title,
        "description": "reported",
        "category": "Roads",
        "status": status,
        "latitude": 16.5062,
        "longitude": 80.648,
        "images": [],
        "created_at": "2024-05-01T09:00:00+00:00",
        "updated_at": "2024-05-01T09:00:00+00:00",
        "assigned_to": null,
        "resolution_notes": null
    })
}

pub const DEFAULT_CATEGORIES: [(&str, &str); 7] = [
    ("Roads", "road"),
    ("Street Lighting", "lightbulb"),
    ("Sanitation", "trash-2"),
    ("Water Supply", "droplet"),
    ("Drainage", "waves"),
    ("Parks & Gardens", "tree-deciduous"),
    ("Other", "circle-alert"),
];

struct Account {
    user: User,
    password: String,
}

struct FakeState {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    complaints: Vec<Complaint>,
    categories: Vec<Category>,
    next_minute: i64,
    offline: bool,
    fail_updates: bool,
    fail_stats: bool,
    update_calls: usize,
}

pub struct FakeBackend {
    session: Arc<SessionContext>,
    state: Mutex<FakeState>,
}

fn unavailable() -> ClientError {
    ClientError::Api {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: None,
    }
}

fn detail(status: StatusCode, message: &str) -> ClientError {
    let detail = Some(message.to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth { status, detail },
        _ => ClientError::Api { status, detail },
    }
}

impl FakeBackend {
    pub fn new(session: Arc<SessionContext>) -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, icon)| Category {
                id: CategoryId::new(),
                name: (*name).to_string(),
                icon: (*icon).to_string(),
            })
            .collect();
        Self {
            session,
            state: Mutex::new(FakeState {
                accounts: Vec::new(),
                tokens: HashMap::new(),
                complaints: Vec::new(),
                categories,
                next_minute: 0,
                offline: false,
                fail_updates: false,
                fail_stats: false,
                update_calls: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn add_account(&self, name: &str, password: &str, role: Role) -> User {
        let user = sample_user(name, role);
        self.lock().accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    pub fn seed(&self, complaint: Complaint) {
        self.lock().complaints.push(complaint);
    }

    pub fn stored(&self, id: ComplaintId) -> Option<Complaint> {
        self.lock().complaints.iter().find(|c| c.id == id).cloned()
    }

    pub fn complaint_count(&self) -> usize {
        self.lock().complaints.len()
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }

    pub fn set_fail_stats(&self, fail: bool) {
        self.lock().fail_stats = fail;
    }

    pub fn update_calls(&self) -> usize {
        self.lock().update_calls
    }

    fn issue(&self, state: &mut FakeState, user: &User) -> AuthResponse {
        let token = format!("fake-{}", uuid::Uuid::new_v4());
        state.tokens.insert(token.clone(), user.id);
        AuthResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: user.clone(),
        }
    }

    /// Resolve the actor from the persisted session, as the backend would
    /// from the bearer header.
    fn actor(&self, state: &FakeState) -> Result<User> {
        if state.offline {
            return Err(unavailable());
        }
        let token = self.session.token().ok_or(ClientError::Unauthenticated)?;
        let user_id = state.tokens.get(&token).ok_or_else(|| {
            detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
        })?;
        state
            .accounts
            .iter()
            .find(|a| a.user.id == *user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "User not found"))
    }

    fn admin(&self, state: &FakeState, what: &str) -> Result<User> {
        let actor = self.actor(state)?;
        match actor.role {
            Role::Admin => Ok(actor),
            Role::Citizen => Err(detail(
                StatusCode::FORBIDDEN,
                &format!("Only admins can {what}"),
            )),
        }
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let mut state = self.lock();
        if state.offline {
            return Err(unavailable());
        }
        let user = state
            .accounts
            .iter()
            .find(|a| a.user.email == request.email && a.password == request.password)
            .map(|a| a.user.clone())
            .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
        Ok(self.issue(&mut state, &user))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let mut state = self.lock();
        if state.offline {
            return Err(unavailable());
        }
        if state.accounts.iter().any(|a| a.user.email == request.email) {
            return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
        }
        let user = User {
            id: UserId::new(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            role: request.role,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: request.password.clone(),
        });
        Ok(self.issue(&mut state, &user))
    }

    async fn me(&self) -> Result<User> {
        let state = self.lock();
        self.actor(&state)
    }
}

#[async_trait]
impl ComplaintRepository for FakeBackend {
    async fn list_complaints(&self, query: &ListQuery) -> Result<Vec<Complaint>> {
        let state = self.lock();
        self.actor(&state)?;
        Ok(state
            .complaints
            .iter()
            .filter(|c| query.status.map_or(true, |s| c.status == s))
            .filter(|c| query.category.as_ref().map_or(true, |cat| &c.category == cat))
            .cloned()
            .collect())
    }

    async fn user_complaints(&self, user_id: UserId) -> Result<Vec<Complaint>> {
        let state = self.lock();
        self.actor(&state)?;
        Ok(state
            .complaints
            .iter()
            .filter(|c| c.reporter.id == user_id)
            .cloned()
            .collect())
    }

    async fn get_complaint(&self, id: ComplaintId) -> Result<Complaint> {
        let state = self.lock();
        self.actor(&state)?;
        state
            .complaints
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Complaint not found"))
    }

    async fn nearby_complaints(&self, center: GeoPoint, radius_m: f64) -> Result<Vec<Complaint>> {
        let state = self.lock();
        self.actor(&state)?;
        Ok(state
            .complaints
            .iter()
            .filter(|c| crate::map::distance_m(center, c.location) <= radius_m)
            .cloned()
            .collect())
    }

    async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint> {
        let mut state = self.lock();
        let actor = self.actor(&state)?;
        let location = GeoPoint::new(complaint.latitude, complaint.longitude)?;
        state.next_minute += 1;
        let created_at = base_time() + Duration::minutes(1_000 + state.next_minute);
        let created = Complaint {
            id: ComplaintId::new(),
            title: complaint.title.clone(),
            description: complaint.description.clone(),
            category: complaint.category.clone(),
            status: Status::Pending,
            location,
            reporter: Reporter {
                id: actor.id,
                name: actor.name,
            },
            created_at,
            updated_at: Some(created_at),
            assigned_to: None,
            resolution_notes: None,
            images: complaint.images.clone(),
        };
        state.complaints.push(created.clone());
        Ok(created)
    }

    async fn update_complaint(
        &self,
        id: ComplaintId,
        update: &ComplaintUpdate,
    ) -> Result<Complaint> {
        let mut state = self.lock();
        state.update_calls += 1;
        if state.fail_updates {
            return Err(unavailable());
        }
        self.admin(&state, "update complaints")?;
        let complaint = state
            .complaints
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Complaint not found"))?;
        complaint.status = update.status;
        complaint.assigned_to = Some(update.assigned_to.clone());
        complaint.resolution_notes = Some(update.resolution_notes.clone());
        complaint.updated_at = Some(Utc::now());
        Ok(complaint.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let state = self.lock();
        if state.offline {
            return Err(unavailable());
        }
        Ok(state.categories.clone())
    }

    async fn stats(&self) -> Result<Stats> {
        let state = self.lock();
        self.admin(&state, "access analytics")?;
        if state.fail_stats {
            return Err(unavailable());
        }
        Ok(crate::analytics::tally(&state.complaints))
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryCount>> {
        let state = self.lock();
        self.admin(&state, "access analytics")?;
        let mut rows: Vec<CategoryCount> = Vec::new();
        for complaint in &state.complaints {
            match rows.iter_mut().find(|r| r.category == complaint.category) {
                Some(row) => row.count += 1,
                None => rows.push(CategoryCount {
                    category: complaint.category.clone(),
                    count: 1,
                }),
            }
        }
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }
}

/// A session context plus a fake backend bound to it.
pub fn fake_env() -> (Arc<SessionContext>, Arc<FakeBackend>) {
    let ctx = Arc::new(SessionContext::in_memory().unwrap_or_else(|e| panic!("store: {e}")));
    let backend = Arc::new(FakeBackend::new(ctx.clone()));
    (ctx, backend)
}

/// Register an account and log it in, persisting the session.
pub async fn logged_in(backend: &FakeBackend, ctx: &SessionContext, role: Role) -> User {
    let name = match role {
        Role::Admin => "Admin",
        Role::Citizen => "Citizen",
    };
    let user = backend.add_account(name, "pw", role);
    let auth = backend
        .login(&LoginRequest {
            email: user.email.clone(),
            password: "pw".into(),
        })
        .await
        .unwrap_or_else(|e| panic!("login: {e}"));
    ctx.begin(auth).unwrap_or_else(|e| panic!("begin: {e}"));
    user
}

pub fn screen_context(
    session: &Arc<SessionContext>,
    backend: &Arc<FakeBackend>,
) -> (crate::screens::ScreenContext, Arc<crate::events::NoticeLog>) {
    screen_context_at(session, backend, None)
}

/// Screen context whose device geolocation reports `location`, or fails when
/// `None`.
pub fn screen_context_at(
    session: &Arc<SessionContext>,
    backend: &Arc<FakeBackend>,
    location: Option<GeoPoint>,
) -> (crate::screens::ScreenContext, Arc<crate::events::NoticeLog>) {
    let notices = Arc::new(crate::events::NoticeLog::new());
    let ctx = crate::screens::ScreenContext {
        session: session.clone(),
        auth: backend.clone(),
        repo: backend.clone(),
        geolocator: Arc::from(crate::map::geolocation::from_config(location)),
        notices: notices.clone(),
    };
    (ctx, notices)
}
