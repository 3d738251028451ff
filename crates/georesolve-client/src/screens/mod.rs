//! Screen controllers.
//!
//! Each screen owns a snapshot of what it fetched and a [`Phase`]. Loads
//! always leave `Phase::Loading`, and a failed load reports exactly one
//! notice.

pub mod admin;
pub mod auth;
pub mod citizen;

use std::sync::Arc;

use georesolve_shared::Session;

use crate::api::{AuthApi, ComplaintRepository};
use crate::error::{ClientError, Result};
use crate::events::{Notice, NoticeSink};
use crate::map::Geolocator;
use crate::routes::Route;
use crate::state::SessionContext;

pub use admin::{AdminDashboard, AnalyticsScreen, ComplaintManagement};
pub use auth::{LoginForm, RegisterForm};
pub use citizen::{CitizenDashboard, ComplaintHistory, ReportError, ReportForm};

/// Everything a screen needs from the outside world.
#[derive(Clone)]
pub struct ScreenContext {
    pub session: Arc<SessionContext>,
    pub auth: Arc<dyn AuthApi>,
    pub repo: Arc<dyn ComplaintRepository>,
    pub geolocator: Arc<dyn Geolocator>,
    pub notices: Arc<dyn NoticeSink>,
}

impl ScreenContext {
    pub fn notify(&self, notice: Notice) {
        self.notices.notify(notice);
    }

    /// Report `error` as one error notice, using the backend's `detail` when
    /// there is one.
    pub fn notify_error(&self, error: &ClientError, fallback: &str) {
        self.notify(Notice::error(error.user_message(fallback)));
    }

    /// Session for a screen already admitted by the guard.
    pub fn session(&self) -> Result<Session> {
        self.session.current().ok_or(ClientError::Unauthenticated)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Failed,
}

impl Phase {
    fn after<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ready,
            Err(_) => Self::Failed,
        }
    }
}

/// Landing screen: an existing session goes straight to its home screen.
pub fn landing(ctx: &ScreenContext) -> Route {
    match ctx.session.current() {
        Some(session) => Route::home_for(session.role()),
        None => Route::Landing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_env, logged_in, screen_context};
    use georesolve_shared::Role;

    #[tokio::test]
    async fn test_landing_redirects_by_role() {
        let (session, backend) = fake_env();
        let (ctx, _) = screen_context(&session, &backend);
        assert_eq!(landing(&ctx), Route::Landing);

        logged_in(&backend, &session, Role::Admin).await;
        assert_eq!(landing(&ctx), Route::AdminDashboard);
    }
}
