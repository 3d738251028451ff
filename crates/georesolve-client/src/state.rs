//! Session context shared by the guard, the repository client and screens.
//!
//! [`SessionContext`] wraps the durable store in a `Mutex` so it can be held
//! behind an `Arc` by every component. Only login, register and logout write
//! to it; everything else reads.

use std::sync::Mutex;

use georesolve_shared::protocol::AuthResponse;
use georesolve_shared::Session;
use georesolve_store::{Database, StoreError};
use tracing::{info, warn};

use crate::error::Result;

pub struct SessionContext {
    database: Mutex<Database>,
}

impl SessionContext {
    pub fn new(database: Database) -> Self {
        Self {
            database: Mutex::new(database),
        }
    }

    /// Context over a throwaway in-memory store.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Read the persisted session. Store failures are logged and read as
    /// "logged out".
    pub fn current(&self) -> Option<Session> {
        match self.with_db(|db| db.load_session()) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "failed to read session");
                None
            }
        }
    }

    /// Bearer credential of the current session.
    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    /// Start a session from a login/register response.
    pub fn begin(&self, auth: AuthResponse) -> Result<Session> {
        let session = Session {
            token: auth.access_token,
            user: auth.user,
        };
        self.with_db(|db| db.save_session(&session))?;
        info!(user_id = %session.user.id, role = %session.user.role, "session started");
        Ok(session)
    }

    pub fn end(&self) -> Result<()> {
        self.with_db(|db| db.clear_session())?;
        info!("session cleared");
        Ok(())
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        let guard = self
            .database
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(f(&guard)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;
    use georesolve_shared::Role;

    #[test]
    fn test_begin_and_end() {
        let ctx = SessionContext::in_memory().unwrap();
        assert!(ctx.current().is_none());

        let user = sample_user("Meena", Role::Citizen);
        let session = ctx
            .begin(AuthResponse {
                access_token: "t1".into(),
                token_type: "bearer".into(),
                user: user.clone(),
            })
            .unwrap();
        assert_eq!(session.user, user);
        assert_eq!(ctx.token().as_deref(), Some("t1"));

        ctx.end().unwrap();
        assert!(ctx.current().is_none());
    }
}
