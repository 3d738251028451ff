//! Session guard.
//!
//! Decides per navigation whether the current actor may view a screen. The
//! decision is recomputed from the persisted session every time; nothing is
//! cached between navigations.

use georesolve_shared::{Role, Session};
use tracing::debug;

use crate::routes::Route;
use crate::state::SessionContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allow(Session),
    RedirectTo(Route),
}

/// Pure decision over a session snapshot.
///
/// No session redirects to the login screen. A session whose role differs
/// from `required` silently redirects to the landing screen.
pub fn authorize(session: Option<Session>, required: Option<Role>) -> Access {
    let Some(session) = session else {
        return Access::RedirectTo(Route::Login);
    };
    match required {
        Some(role) if session.role() != role => Access::RedirectTo(Route::Landing),
        _ => Access::Allow(session),
    }
}

impl SessionContext {
    pub fn authorize(&self, required: Option<Role>) -> Access {
        authorize(self.current(), required)
    }

    /// Resolve a navigation request to the screen actually shown.
    ///
    /// Public screens are always allowed. Redirect targets are public, so at
    /// most one redirect happens.
    pub fn navigate(&self, target: Route) -> (Route, Option<Session>) {
        if !target.is_protected() {
            return (target, self.current());
        }
        match self.authorize(target.required_role()) {
            Access::Allow(session) => (target, Some(session)),
            Access::RedirectTo(route) => {
                debug!(from = %target, to = %route, "navigation redirected");
                (route, None)
            }
        }
    }
}
